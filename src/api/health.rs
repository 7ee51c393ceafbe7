use axum::response::IntoResponse;
use serde_json::json;

use super::response::success;

/// 健康检查端点
pub async fn health_check() -> impl IntoResponse {
    success(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
