// 媒体类型与统一入口
//
// 媒体分为两种获取形态：
// - 字节：位图、SVG，经由 MediaCacheEngine
// - 文件：Lottie 动画，经由 LottieCache
// MediaCache 按媒体类型分派到对应实现

use crate::services::cache::{
    CacheConfig, CacheError, CacheStats, DirectoryResolver, HttpFetchClient, LottieCache,
    MediaCacheEngine,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// 媒体类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// 位图（png、jpg、gif、webp 等）
    Image,

    /// 矢量图
    Svg,

    /// Lottie 动画描述文件
    Lottie,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Svg => "svg",
            MediaKind::Lottie => "lottie",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaKind::Image),
            "svg" => Some(MediaKind::Svg),
            "lottie" => Some(MediaKind::Lottie),
            _ => None,
        }
    }

    /// URL 路径部分的扩展名（小写，忽略查询串和片段），没有扩展名时为空串
    pub fn url_extension(url: &str) -> String {
        let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// 根据 URL 路径的扩展名推断媒体类型，无法判断时按位图处理
    pub fn from_url(url: &str) -> Self {
        match Self::url_extension(url).as_str() {
            "svg" => MediaKind::Svg,
            "json" | "lottie" => MediaKind::Lottie,
            _ => MediaKind::Image,
        }
    }
}

/// 获取到的媒体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaAsset {
    /// 媒体字节（与缓存中的副本互相独立）
    Bytes(Vec<u8>),

    /// 缓存文件路径（调用方只读）
    File(PathBuf),
}

/// 媒体获取能力
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<MediaAsset, CacheError>;

    async fn clear(&self, url: &str) -> Result<(), CacheError>;
}

#[async_trait]
impl MediaSource for MediaCacheEngine {
    async fn fetch(&self, url: &str) -> Result<MediaAsset, CacheError> {
        self.fetch_media(url).await.map(MediaAsset::Bytes)
    }

    async fn clear(&self, url: &str) -> Result<(), CacheError> {
        self.clear_cache(url).await
    }
}

#[async_trait]
impl MediaSource for LottieCache {
    async fn fetch(&self, url: &str) -> Result<MediaAsset, CacheError> {
        self.fetch_lottie_file(url).await.map(MediaAsset::File)
    }

    async fn clear(&self, url: &str) -> Result<(), CacheError> {
        self.clear_cache(url).await
    }
}

/// 各命名空间的缓存统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MediaCacheStats {
    pub primary: CacheStats,
    pub lottie: CacheStats,
}

/// 媒体缓存统一入口
///
/// 位图和 SVG 共用主命名空间目录，但各自持有引擎实例（请求头等配置不同）
pub struct MediaCache {
    image: MediaCacheEngine,
    svg: MediaCacheEngine,
    lottie: LottieCache,
}

impl MediaCache {
    /// 按配置创建，使用系统临时目录作为平台目录
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_resolver(config, DirectoryResolver::default())
    }

    /// 按配置创建，指定目录解析器
    pub fn with_resolver(config: &CacheConfig, resolver: DirectoryResolver) -> Self {
        let timeout = config.request_timeout();
        let client = |kind: MediaKind| -> Arc<HttpFetchClient> {
            Arc::new(HttpFetchClient::from_kind_config(config.kind(kind), timeout))
        };

        Self {
            image: MediaCacheEngine::new(
                config.cache_dir.clone(),
                resolver.clone(),
                client(MediaKind::Image),
            )
            .with_cache_enabled(config.image.cache_enabled),
            svg: MediaCacheEngine::new(
                config.cache_dir.clone(),
                resolver.clone(),
                client(MediaKind::Svg),
            )
            .with_cache_enabled(config.svg.cache_enabled),
            lottie: LottieCache::new(
                config.cache_dir.clone(),
                resolver,
                client(MediaKind::Lottie),
            )
            .with_cache_enabled(config.lottie.cache_enabled),
        }
    }

    /// 由已有组件组装
    pub fn from_parts(image: MediaCacheEngine, svg: MediaCacheEngine, lottie: LottieCache) -> Self {
        Self { image, svg, lottie }
    }

    /// 某个媒体类型对应的获取实现
    pub fn source(&self, kind: MediaKind) -> &dyn MediaSource {
        match kind {
            MediaKind::Image => &self.image,
            MediaKind::Svg => &self.svg,
            MediaKind::Lottie => &self.lottie,
        }
    }

    /// Lottie 缓存（需要直接拿到文件路径时使用）
    pub fn lottie(&self) -> &LottieCache {
        &self.lottie
    }

    pub async fn fetch(&self, kind: MediaKind, url: &str) -> Result<MediaAsset, CacheError> {
        self.source(kind).fetch(url).await
    }

    pub async fn clear(&self, kind: MediaKind, url: &str) -> Result<(), CacheError> {
        self.source(kind).clear(url).await
    }

    /// 主命名空间与 Lottie 命名空间的统计
    pub async fn stats(&self) -> Result<MediaCacheStats, CacheError> {
        Ok(MediaCacheStats {
            primary: self.image.stats().await?,
            lottie: self.lottie.stats().await?,
        })
    }
}
