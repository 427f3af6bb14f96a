//! Configuration for the Catalog API

use core_config::{AppInfo, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::common::RetryConfig;
use database::postgres::PostgresConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Backing store for the products table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    #[default]
    Postgres,
    /// Process-local map; data is lost on restart
    Memory,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub store: StoreKind,
    /// Present only when `store` is [`StoreKind::Postgres`]
    pub postgres: Option<PostgresConfig>,
    /// Startup connection retries
    pub retry: RetryConfig,
}

impl Config {
    /// `STORE` selects the backend (`postgres` by default); `DATABASE_URL`
    /// is only required for `postgres`.
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let store: StoreKind = env_parse_or("STORE", StoreKind::default())?;

        let retry = RetryConfig::from_env()?;
        let postgres = match store {
            StoreKind::Postgres => Some(PostgresConfig::from_env()?),
            StoreKind::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            store,
            postgres,
            retry,
        })
    }
}
