use sea_orm::DbErr;

/// Failures of the readiness probe and the migration runner
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("PostgreSQL ping failed: {0}")]
    HealthCheckFailed(#[source] DbErr),

    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] DbErr),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
