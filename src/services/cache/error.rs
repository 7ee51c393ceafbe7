// 缓存模块错误类型定义
//
// 定义了缓存操作中可能出现的各种错误类型

use std::path::PathBuf;
use thiserror::Error;

/// 缓存操作的统一错误类型
#[derive(Debug, Error)]
pub enum CacheError {
    /// 既没有覆盖目录，也无法获取平台缓存目录（或目录创建失败）
    #[error("缓存目录不可用: {0}")]
    DirectoryUnavailable(String),

    /// 读取缓存文件失败（"文件不存在"不属于此错误）
    #[error("读取缓存失败: {path:?}")]
    StoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 写入或删除缓存文件失败
    #[error("写入缓存失败: {path:?}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("下载错误: {0}")]
    Fetch(#[from] FetchError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 下载相关错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 服务器返回了非 200 状态码
    #[error("HTTP 错误: 状态码 {status_code}, url={url}")]
    HttpStatus { status_code: u16, url: String },

    /// 连接层错误（DNS、TLS、超时、连接重置等）
    #[error("网络错误: url={url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// HTTP 状态码（仅 `HttpStatus` 有值）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status_code, .. } => Some(*status_code),
            FetchError::Network { .. } => None,
        }
    }

    /// 出错的 URL
    pub fn url(&self) -> &str {
        match self {
            FetchError::HttpStatus { url, .. } | FetchError::Network { url, .. } => url,
        }
    }
}

impl CacheError {
    /// 如果是下载错误，返回其 HTTP 状态码
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CacheError::Fetch(e) => e.status_code(),
            _ => None,
        }
    }
}
