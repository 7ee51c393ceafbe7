// 缓存管理 API
//
// 提供缓存统计和配置查询的 HTTP 端点

use axum::{extract::State, response::IntoResponse};

use super::error::ApiResult;
use super::response::success;
use super::AppState;

/// 获取缓存统计
///
/// # 端点
/// GET /api/cache/stats
///
/// # 响应
/// ```json
/// {
///   "success": true,
///   "data": {
///     "primary": { "entries": 12, "total_bytes": 482133 },
///     "lottie": { "entries": 2, "total_bytes": 10240 }
///   }
/// }
/// ```
pub async fn get_cache_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = state.media_cache.stats().await?;

    tracing::debug!("获取缓存统计成功: {:?}", stats);

    Ok(success(stats))
}

/// 获取缓存配置
///
/// # 端点
/// GET /api/cache/config
pub async fn get_cache_config(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let config = state.config_manager.get_config().await;

    Ok(success(config))
}
