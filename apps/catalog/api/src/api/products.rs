//! Products routes wired to the configured store

use axum::Router;
use domain_products::{InMemoryProductRepository, PgProductRepository, ProductService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    match &state.db {
        Some(db) => {
            let repository = PgProductRepository::new(db.clone());
            handlers::router(ProductService::new(repository))
        }
        None => {
            tracing::warn!("Using in-memory product store; data will not survive a restart");
            handlers::router(ProductService::new(InMemoryProductRepository::new()))
        }
    }
}
