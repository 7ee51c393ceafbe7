pub mod cache;
pub mod error;
pub mod health;
pub mod media;
pub mod response;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::services::cache::{ConfigManager, MediaCache};

#[derive(Clone)]
pub struct AppState {
    pub media_cache: Arc<MediaCache>,
    pub config_manager: Arc<ConfigManager>,
}

/// 构建 HTTP 路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Network Media Cache API v1.0" }))
        .route("/api/health", get(health::health_check))
        // Media
        .route("/api/media", get(media::get_media).delete(media::delete_media))
        .route("/api/lottie", get(media::get_lottie).delete(media::delete_lottie))
        // Cache
        .route("/api/cache/stats", get(cache::get_cache_stats))
        .route("/api/cache/config", get(cache::get_cache_config))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
