// 缓存配置数据结构
//
// 定义了缓存配置的核心数据结构，包括：
// - 全局缓存配置（覆盖目录、请求超时）
// - 每种媒体类型的独立配置

use crate::services::cache::MediaKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// 缓存配置（存储在 cache_config.json）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// 覆盖缓存目录
    /// - Some: 直接使用该目录（Lottie 使用其下的 lottie 子目录）
    /// - None: 使用平台临时目录下的 network_media_cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// 下载超时（秒），默认不限时
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// 位图配置
    #[serde(default = "MediaKindConfig::image")]
    pub image: MediaKindConfig,

    /// SVG 配置
    #[serde(default = "MediaKindConfig::svg")]
    pub svg: MediaKindConfig,

    /// Lottie 动画配置
    #[serde(default = "MediaKindConfig::lottie")]
    pub lottie: MediaKindConfig,
}

/// 单个媒体类型的配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaKindConfig {
    /// 是否开启磁盘缓存
    /// - false: 每次都下载，不读写缓存
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// 下载时附加的请求头
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_cache_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    /// 默认配置：平台目录，不限时，所有类型开启缓存
    fn default() -> Self {
        Self {
            cache_dir: None,
            request_timeout_secs: None,
            image: MediaKindConfig::image(),
            svg: MediaKindConfig::svg(),
            lottie: MediaKindConfig::lottie(),
        }
    }
}

impl CacheConfig {
    /// 获取某个媒体类型的配置
    pub fn kind(&self, kind: MediaKind) -> &MediaKindConfig {
        match kind {
            MediaKind::Image => &self.image,
            MediaKind::Svg => &self.svg,
            MediaKind::Lottie => &self.lottie,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl MediaKindConfig {
    fn with_accept(accept: &str) -> Self {
        Self {
            cache_enabled: true,
            headers: BTreeMap::from([("Accept".to_string(), accept.to_string())]),
        }
    }

    /// 位图默认配置
    pub fn image() -> Self {
        Self::with_accept("image/avif,image/webp,image/apng,image/*,*/*;q=0.8")
    }

    /// SVG 默认配置
    pub fn svg() -> Self {
        Self::with_accept("image/svg+xml,*/*;q=0.8")
    }

    /// Lottie 默认配置
    pub fn lottie() -> Self {
        Self::with_accept("application/json,*/*;q=0.8")
    }
}
