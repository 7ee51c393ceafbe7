// 缓存路径管理
//
// 负责解析并创建缓存根目录，提供统一的缓存文件路径生成规则

use crate::services::cache::CacheError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// 平台缓存目录查询
///
/// 返回 `None`（或空路径）表示平台没有可用的缓存目录
pub trait BasePathProvider: Send + Sync {
    fn temp_cache_dir(&self) -> Option<PathBuf>;
}

/// 使用系统临时目录作为平台缓存目录
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTempDir;

impl BasePathProvider for SystemTempDir {
    fn temp_cache_dir(&self) -> Option<PathBuf> {
        Some(std::env::temp_dir())
    }
}

/// 缓存路径生成器
pub struct CachePath;

impl CachePath {
    /// 平台缓存目录下的命名空间目录
    pub const NAMESPACE_DIR: &'static str = "network_media_cache";

    /// Lottie 缓存子目录
    pub const LOTTIE_DIR: &'static str = "lottie";

    /// 主缓存文件扩展名
    pub const PRIMARY_EXT: &'static str = "cache";

    /// Lottie 缓存文件扩展名
    pub const LOTTIE_EXT: &'static str = "json";

    /// 生成缓存文件路径：`{root}/{key}.{ext}`
    ///
    /// # 示例
    /// ```
    /// use std::path::Path;
    /// use network_media_cache::services::cache::CachePath;
    ///
    /// let path = CachePath::entry_path(Path::new("/tmp/c"), "abc", "cache");
    /// assert_eq!(path, Path::new("/tmp/c/abc.cache"));
    /// ```
    pub fn entry_path(root: &Path, key: &str, extension: &str) -> PathBuf {
        root.join(format!("{}.{}", key, extension))
    }
}

/// 缓存根目录解析器
///
/// 本身无状态，可重复调用；结果由调用方（引擎实例）缓存
#[derive(Clone)]
pub struct DirectoryResolver {
    base: Arc<dyn BasePathProvider>,
}

impl Default for DirectoryResolver {
    fn default() -> Self {
        Self::new(Arc::new(SystemTempDir))
    }
}

impl std::fmt::Debug for DirectoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryResolver").finish_non_exhaustive()
    }
}

impl DirectoryResolver {
    pub fn new(base: Arc<dyn BasePathProvider>) -> Self {
        Self { base }
    }

    /// 解析并确保缓存根目录存在
    ///
    /// # 参数
    /// - `override_dir`: 调用方指定的目录，非空时替代平台目录
    /// - `subpath`: 子命名空间目录，主命名空间传空字符串
    ///
    /// # 返回
    /// - 有覆盖目录：`{override}` 或 `{override}/{subpath}`
    /// - 无覆盖目录：`{platform}/network_media_cache[/{subpath}]`
    /// - 平台目录不可用或目录创建失败：`CacheError::DirectoryUnavailable`
    pub async fn resolve_root(
        &self,
        override_dir: Option<&Path>,
        subpath: &str,
    ) -> Result<PathBuf, CacheError> {
        let override_dir = override_dir.filter(|p| !p.as_os_str().is_empty());

        let root = match override_dir {
            Some(dir) => with_subpath(dir.to_path_buf(), subpath),
            None => {
                let base = self
                    .base
                    .temp_cache_dir()
                    .filter(|p| !p.as_os_str().is_empty())
                    .ok_or_else(|| {
                        CacheError::DirectoryUnavailable("平台未提供缓存目录".to_string())
                    })?;
                with_subpath(base.join(CachePath::NAMESPACE_DIR), subpath)
            }
        };

        // create_dir_all 对已存在的目录不报错
        fs::create_dir_all(&root).await.map_err(|e| {
            CacheError::DirectoryUnavailable(format!("创建目录失败 {:?}: {}", root, e))
        })?;

        debug!("缓存根目录已就绪: {:?}", root);
        Ok(root)
    }
}

fn with_subpath(dir: PathBuf, subpath: &str) -> PathBuf {
    if subpath.is_empty() {
        dir
    } else {
        dir.join(subpath)
    }
}
