//! Application state management

use database::postgres::DatabaseConnection;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when running on the in-memory store
    pub db: Option<DatabaseConnection>,
}
