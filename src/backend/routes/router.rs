/**
 * Router Configuration
 *
 * Combines the API routes, the WebSocket endpoint and static file serving
 * into one router.
 *
 * # Route Order
 *
 * 1. API routes under `/api`
 * 2. `GET /ws` when real-time push is enabled
 * 3. `/audio` served from the local blob directory, if blobs are local
 * 4. Fallback: the static front-end directory (404 when nothing matches)
 *
 * CORS and request tracing wrap every route.
 */

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::backend::middleware::auth::{ADMIN_PASSWORD_HEADER, ADMIN_SECRET_HEADER};
use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::backend::storage::blobs::LOCAL_AUDIO_ROUTE;
use crate::shared::BlobBackend;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let config = app_state.config.clone();

    let mut router = configure_api_routes(Router::new(), &config);

    if config.realtime {
        router = router.route("/ws", get(handle_socket_upgrade));
    }

    if let BlobBackend::Local { dir } = &config.blobs {
        router = router.nest_service(LOCAL_AUDIO_ROUTE, ServeDir::new(dir));
    }

    router
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors_origins)),
        )
        .with_state(app_state)
}

/// CORS for the configured origins
///
/// With no origins configured any origin may call the API, but without
/// credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ADMIN_PASSWORD_HEADER),
            HeaderName::from_static(ADMIN_SECRET_HEADER),
        ]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}
