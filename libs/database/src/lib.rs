//! PostgreSQL connectivity for the catalog services.
//!
//! Wraps SeaORM connection setup, startup retries, readiness checks and the
//! migration runner so that apps only deal with a [`postgres::DatabaseConnection`].
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "catalog_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
