pub mod cache;

pub use cache::{CacheConfig, CacheError, ConfigManager, MediaAsset, MediaCache, MediaKind};
