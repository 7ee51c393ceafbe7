// 媒体获取 API
//
// 为本地 UI 客户端提供缓存媒体的 HTTP 端点：
// - 获取媒体内容（按类型走字节缓存或 Lottie 文件缓存）
// - 获取 Lottie 缓存文件路径
// - 清除单个 URL 的缓存

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tokio::fs;
use url::Url;

use crate::services::cache::{MediaAsset, MediaKind};

use super::error::{ApiError, ApiResult};
use super::response::{success, success_message};
use super::AppState;

/// 媒体请求参数
#[derive(Debug, Deserialize)]
pub struct MediaParams {
    pub url: String,
    /// image / svg / lottie，缺省时按 URL 扩展名推断
    pub kind: Option<String>,
}

/// Lottie 请求参数
#[derive(Debug, Deserialize)]
pub struct LottieParams {
    pub url: String,
}

/// 获取媒体内容
///
/// # 端点
/// GET /api/media?url=https://example.com/a.png&kind=image
///
/// # 响应
/// 媒体原始字节，Content-Type 按媒体类型设置
pub async fn get_media(
    State(state): State<AppState>,
    Query(params): Query<MediaParams>,
) -> ApiResult<Response> {
    validate_url(&params.url)?;
    let kind = resolve_kind(&params)?;

    let bytes = match state.media_cache.fetch(kind, &params.url).await? {
        MediaAsset::Bytes(bytes) => bytes,
        MediaAsset::File(path) => fs::read(&path)
            .await
            .map_err(|e| ApiError::Internal(format!("读取缓存文件失败 {:?}: {}", path, e)))?,
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(kind, &params.url))
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(format!("构建响应失败: {}", e)))
}

/// 清除媒体缓存
///
/// # 端点
/// DELETE /api/media?url=https://example.com/a.png&kind=image
pub async fn delete_media(
    State(state): State<AppState>,
    Query(params): Query<MediaParams>,
) -> ApiResult<impl IntoResponse> {
    validate_url(&params.url)?;
    let kind = resolve_kind(&params)?;

    state.media_cache.clear(kind, &params.url).await?;

    Ok(success_message("缓存已清除"))
}

/// 获取 Lottie 缓存文件路径
///
/// # 端点
/// GET /api/lottie?url=https://example.com/anim.json
///
/// # 响应
/// ```json
/// {
///   "success": true,
///   "data": { "path": "/tmp/network_media_cache/lottie/https___example.com_anim.json.json" }
/// }
/// ```
pub async fn get_lottie(
    State(state): State<AppState>,
    Query(params): Query<LottieParams>,
) -> ApiResult<impl IntoResponse> {
    validate_url(&params.url)?;

    let path = state.media_cache.lottie().fetch_lottie_file(&params.url).await?;

    Ok(success(json!({ "path": path })))
}

/// 清除 Lottie 缓存
///
/// # 端点
/// DELETE /api/lottie?url=https://example.com/anim.json
pub async fn delete_lottie(
    State(state): State<AppState>,
    Query(params): Query<LottieParams>,
) -> ApiResult<impl IntoResponse> {
    validate_url(&params.url)?;

    state.media_cache.clear(MediaKind::Lottie, &params.url).await?;

    Ok(success_message("缓存已清除"))
}

/// 只接受 http / https URL
fn validate_url(url: &str) -> ApiResult<()> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ApiError::BadRequest(format!("无效的 URL: {}", url))),
    }
}

fn resolve_kind(params: &MediaParams) -> ApiResult<MediaKind> {
    match params.kind.as_deref() {
        None => Ok(MediaKind::from_url(&params.url)),
        Some(kind) => MediaKind::from_str(kind)
            .ok_or_else(|| ApiError::BadRequest(format!("未知的媒体类型: {}", kind))),
    }
}

/// 按媒体类型和扩展名确定 Content-Type
fn content_type_for(kind: MediaKind, url: &str) -> &'static str {
    match kind {
        MediaKind::Svg => "image/svg+xml",
        MediaKind::Lottie => "application/json",
        MediaKind::Image => match MediaKind::url_extension(url).as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "avif" => "image/avif",
            "bmp" => "image/bmp",
            "ico" => "image/x-icon",
            _ => "application/octet-stream",
        },
    }
}
