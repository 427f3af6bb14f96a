use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        store = %config.store,
        "Starting Catalog API"
    );

    let db = match config.postgres.clone() {
        Some(postgres) => {
            let db = connect_from_config_with_retry(postgres, Some(config.retry.clone())).await?;
            run_migrations::<migration::Migrator>(&db, config.app.name).await?;
            Some(db)
        }
        None => None,
    };

    let state = AppState {
        config: config.clone(),
        db: db.clone(),
    };

    let router = app(state);

    let cleanup = async move {
        if let Some(db) = db {
            info!("Closing PostgreSQL connection pool");
            if let Err(e) = db.close().await {
                tracing::error!("Failed to close PostgreSQL pool: {}", e);
            }
        }
    };

    create_production_app(router, &config.server, cleanup).await?;

    info!("Catalog API shut down");
    Ok(())
}

/// Full application router: `/api/*`, OpenAPI, `/health` and `/ready`
fn app(state: AppState) -> axum::Router {
    let api_routes = api::routes(&state);

    create_router::<openapi::ApiDoc>(api_routes)
        .merge(health_router(state.config.app))
        .merge(api::health::router(state))
}
