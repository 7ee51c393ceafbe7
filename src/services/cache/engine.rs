// 媒体缓存引擎 - 协调目录解析、键生成、磁盘存储和网络下载
//
// 请求流程：
// 1. 首次访问时解析缓存根目录（每个实例只解析一次）
// 2. 由 URL 生成缓存键
// 3. 命中直接返回；未命中则下载 -> 写入 -> 返回

use crate::services::cache::{
    CacheError, CachePath, CacheStats, CacheStore, DirectoryResolver, Fetcher, KeyCodec,
    Namespace,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// 延迟初始化的缓存存储
///
/// 状态只有 未初始化 -> 就绪 一个方向；并发的首次访问只会解析一次目录
pub(crate) struct LazyStore {
    /// 调用方指定的覆盖目录
    override_dir: Option<PathBuf>,

    /// 子命名空间目录，主命名空间为空
    subpath: &'static str,

    /// 缓存文件扩展名
    extension: &'static str,

    resolver: DirectoryResolver,

    store: OnceCell<CacheStore>,
}

impl LazyStore {
    pub(crate) fn new(
        override_dir: Option<PathBuf>,
        subpath: &'static str,
        extension: &'static str,
        resolver: DirectoryResolver,
    ) -> Self {
        Self {
            override_dir,
            subpath,
            extension,
            resolver,
            store: OnceCell::new(),
        }
    }

    /// 确保就绪并返回存储
    ///
    /// 解析失败不会被缓存，下次调用会重新尝试
    pub(crate) async fn get(&self) -> Result<&CacheStore, CacheError> {
        self.store
            .get_or_try_init(|| async {
                let root = self
                    .resolver
                    .resolve_root(self.override_dir.as_deref(), self.subpath)
                    .await?;
                info!("缓存目录初始化完成: {:?}", root);
                Ok::<_, CacheError>(CacheStore::new(root, self.extension))
            })
            .await
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.store.initialized()
    }
}

/// 媒体缓存引擎（字节缓存）
///
/// 返回媒体的完整字节。磁盘布局：`{root}/{sha256(url)}.cache`
pub struct MediaCacheEngine {
    store: LazyStore,

    fetcher: Arc<dyn Fetcher>,

    /// 关闭后每次都直接下载，不读写缓存
    cache_enabled: bool,
}

impl MediaCacheEngine {
    /// 创建引擎，此时不会访问文件系统
    ///
    /// # 参数
    /// - `cache_dir`: 覆盖目录，`None` 时使用平台目录
    /// - `resolver`: 目录解析器
    /// - `fetcher`: 下载客户端
    pub fn new(
        cache_dir: Option<PathBuf>,
        resolver: DirectoryResolver,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            store: LazyStore::new(cache_dir, "", CachePath::PRIMARY_EXT, resolver),
            fetcher,
            cache_enabled: true,
        }
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// 缓存根目录是否已解析
    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// 解析后的缓存根目录
    pub async fn root(&self) -> Result<&Path, CacheError> {
        Ok(self.store.get().await?.root())
    }

    /// 获取媒体字节
    ///
    /// # 返回
    /// - 命中：磁盘上的缓存内容，不访问网络
    /// - 未命中：下载内容，写入缓存后返回
    /// - 下载失败：直接返回 `CacheError::Fetch`，不写入任何文件
    ///
    /// # 示例
    /// ```no_run
    /// use network_media_cache::services::cache::{
    ///     DirectoryResolver, HttpFetchClient, MediaCacheEngine,
    /// };
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = MediaCacheEngine::new(
    ///     None,
    ///     DirectoryResolver::default(),
    ///     Arc::new(HttpFetchClient::new()),
    /// );
    /// let bytes = engine.fetch_media("https://example.com/a.png").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_media(&self, url: &str) -> Result<Vec<u8>, CacheError> {
        if !self.cache_enabled {
            debug!("缓存已关闭，跳过读写: {}", url);
            info!("Cache MISS for: {} - Downloading...", url);
            return Ok(self.fetcher.download(url).await?);
        }

        let store = self.store.get().await?;
        let key = KeyCodec::derive_key(url, Namespace::Primary);

        if let Some(cached) = store.get(&key).await? {
            info!("Cache HIT for: {}", url);
            return Ok(cached);
        }

        info!("Cache MISS for: {} - Downloading...", url);
        let data = self.fetcher.download(url).await?;
        store.put(&key, &data).await?;

        Ok(data)
    }

    /// 删除 URL 对应的缓存，条目不存在时不报错
    pub async fn clear_cache(&self, url: &str) -> Result<(), CacheError> {
        let store = self.store.get().await?;
        let key = KeyCodec::derive_key(url, Namespace::Primary);
        store.delete(&key).await?;
        debug!("已清除缓存: {}", url);
        Ok(())
    }

    /// 缓存统计
    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        self.store.get().await?.stats().await
    }
}
