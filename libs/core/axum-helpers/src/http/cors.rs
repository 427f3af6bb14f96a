use tower_http::cors::CorsLayer;

/// Any origin, any method, any header.
///
/// The catalog API is consumed by a separately hosted front end, so this is
/// the only layer offered.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
