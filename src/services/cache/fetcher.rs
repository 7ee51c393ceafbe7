// 网络下载
//
// 单次下载媒体原始字节：
// - 只有 HTTP 200 视为成功
// - 不做内部重试
// - 每次调用创建独立的 HTTP 客户端，调用结束即释放，不复用连接

use crate::services::cache::{FetchError, MediaKindConfig};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// 下载能力
///
/// 引擎通过该接口访问网络，测试中可替换为桩实现
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 下载 URL 的完整响应体
    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// 基于 reqwest 的下载客户端
#[derive(Debug, Clone, Default)]
pub struct HttpFetchClient {
    /// 附加请求头
    headers: HeaderMap,

    /// 请求超时，`None` 表示不限时
    timeout: Option<Duration>,
}

impl HttpFetchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按媒体类型配置创建客户端
    ///
    /// 无法解析的请求头会被忽略并记录警告
    pub fn from_kind_config(config: &MediaKindConfig, timeout: Option<Duration>) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("忽略无效的请求头: {}: {}", name, value),
            }
        }

        Self { headers, timeout }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 构建本次调用使用的客户端
    fn build_client(&self, url: &str) -> Result<Client, FetchError> {
        let mut builder = Client::builder().default_headers(self.headers.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetchClient {
    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        // 客户端只在本次调用内存活，任何返回路径都会释放
        let client = self.build_client(url)?;

        debug!("开始下载: {}", url);

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        debug!("下载完成: {} ({} 字节)", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
