use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::services::cache::CacheError;

/// 统一的API错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 请求参数错误
    BadRequest(String),
    /// 上游下载失败
    ExternalService(String),
    /// 内部服务器错误（缓存目录、磁盘读写等）
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ExternalService(msg) => write!(f, "External service error: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// 从CacheError转换
impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Fetch(e) => ApiError::ExternalService(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// 实现IntoResponse，将错误转换为HTTP响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::ExternalService(ref msg) => {
                tracing::warn!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, "external_service_error", msg.clone())
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    msg.clone(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
