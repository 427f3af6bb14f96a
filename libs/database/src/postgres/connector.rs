use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Open a connection pool using `config`.
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let target = config.redacted_url();
    let db = Database::connect(config.into_connect_options()).await?;
    info!(database = %target, "Connected to PostgreSQL");
    Ok(db)
}

/// Open a connection pool, retrying with backoff while the server is unreachable.
///
/// `None` uses [`RetryConfig::default`]; apps pass [`RetryConfig`] read from
/// the environment.
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DbErr> {
    retry_with_backoff(
        || connect_from_config(config.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
}

/// Apply all pending migrations from `M`.
///
/// `app_name` only appears in log lines.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None).await.map_err(DatabaseError::MigrationFailed)?;
    info!(app = app_name, "Database migrations complete");
    Ok(())
}
