use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{not_found, panic_response};
use crate::http::{create_permissive_cors_layer, security_headers};
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wraps the API routes with the cross-cutting layers every catalog service
/// shares.
///
/// - `GET /api-docs/openapi.json` serving `T`'s document
/// - `apis` nested under `/api`
/// - JSON 404 fallback
/// - request tracing, panic-to-500, security headers, permissive CORS and
///   response compression
///
/// Domain routers apply their own state before being passed in. Health
/// endpoints are merged by the caller with [`health_router`](super::health_router).
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    let doc = T::openapi();

    Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = doc.clone();
                async move { Json(doc) }
            }),
        )
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(security_headers))
        .layer(create_permissive_cors_layer())
        // gzip, br, deflate, zstd per Accept-Encoding
        .layer(CompressionLayer::new())
}

/// Serve `router` until a shutdown signal, then run `cleanup`.
///
/// In-flight requests drain first. `cleanup` is bounded by
/// `server_config.shutdown_timeout`; when it overruns, the process moves on
/// without waiting further.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     db.close().await.ok();
/// };
/// create_production_app(router, &config, cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}
