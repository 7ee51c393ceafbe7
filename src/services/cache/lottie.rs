// Lottie 动画缓存
//
// 文件型渲染器需要的是文件路径而不是字节，因此缓存以文件存在与否判断命中，
// 返回缓存文件的路径。磁盘布局：`{root}/lottie/{sanitize(url)}.json`

use crate::services::cache::engine::LazyStore;
use crate::services::cache::{
    CacheError, CachePath, CacheStats, DirectoryResolver, Fetcher, KeyCodec, Namespace,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Lottie 动画缓存
pub struct LottieCache {
    store: LazyStore,
    fetcher: Arc<dyn Fetcher>,
    cache_enabled: bool,
}

impl LottieCache {
    /// 创建 Lottie 缓存
    ///
    /// `cache_dir` 与主缓存使用同一个覆盖目录，文件放在其下的 `lottie` 子目录
    pub fn new(
        cache_dir: Option<PathBuf>,
        resolver: DirectoryResolver,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            store: LazyStore::new(
                cache_dir,
                CachePath::LOTTIE_DIR,
                CachePath::LOTTIE_EXT,
                resolver,
            ),
            fetcher,
            cache_enabled: true,
        }
    }

    /// 关闭缓存时仍会写文件（渲染器需要路径），但每次都重新下载
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// 获取 Lottie 文件路径
    ///
    /// # 返回
    /// - 文件已存在：直接返回路径，不访问网络
    /// - 文件不存在：下载并写入后返回路径
    ///
    /// 返回的文件归缓存所有，调用方只应读取
    pub async fn fetch_lottie_file(&self, url: &str) -> Result<PathBuf, CacheError> {
        let store = self.store.get().await?;
        let key = KeyCodec::derive_key(url, Namespace::Lottie);
        let path = store.entry_path(&key);

        if self.cache_enabled && store.contains(&key).await? {
            info!("Cache HIT for: {}", url);
            return Ok(path);
        }

        info!("Cache MISS for: {} - Downloading...", url);
        let data = self.fetcher.download(url).await?;
        store.put(&key, &data).await?;

        Ok(path)
    }

    /// 删除 URL 对应的 Lottie 文件，不存在时不报错
    pub async fn clear_cache(&self, url: &str) -> Result<(), CacheError> {
        let store = self.store.get().await?;
        store
            .delete(&KeyCodec::derive_key(url, Namespace::Lottie))
            .await?;
        debug!("已清除 Lottie 缓存: {}", url);
        Ok(())
    }

    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        self.store.get().await?.stats().await
    }
}
