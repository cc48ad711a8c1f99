pub mod config;
pub mod error;
pub mod normalize;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};

use feedgate_scrapers::{FeedSource, ProfileSource};

pub use config::Config;

pub struct AppState {
    pub feed: Arc<dyn FeedSource>,
    pub profiles: Arc<dyn ProfileSource>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(routes::root))
        .route("/facebook_posts", get(routes::facebook_posts))
        .route("/instagram_posts", get(routes::instagram_posts))
        .with_state(state)
        // Logging layer: method + path only, account names stay out of span fields
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
