// 缓存模块 - 网络媒体磁盘缓存
//
// 本模块提供网络媒体的磁盘缓存功能，包括：
// - 缓存键生成
// - 缓存目录解析（延迟初始化）
// - 磁盘存储
// - 网络下载
// - 位图/SVG 字节缓存与 Lottie 文件缓存

pub mod config;
pub mod config_manager;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod key;
pub mod lottie;
pub mod media;
pub mod path;
pub mod store;

pub use config::{CacheConfig, MediaKindConfig};
pub use config_manager::ConfigManager;
pub use engine::MediaCacheEngine;
pub use error::{CacheError, FetchError};
pub use fetcher::{Fetcher, HttpFetchClient};
pub use key::{KeyCodec, Namespace};
pub use lottie::LottieCache;
pub use media::{MediaAsset, MediaCache, MediaCacheStats, MediaKind, MediaSource};
pub use path::{BasePathProvider, CachePath, DirectoryResolver, SystemTempDir};
pub use store::{CacheStats, CacheStore};
