use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

/// Ping the pool; used by the `/ready` endpoint.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<()> {
    db.ping().await.map_err(DatabaseError::HealthCheckFailed)?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
