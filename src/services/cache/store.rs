// 磁盘缓存存储
//
// 一个缓存条目对应一个文件：`{root}/{key}.{ext}`。
// 不维护内存索引，每次操作都直接访问文件系统。

use crate::services::cache::{CacheError, CachePath};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 同一进程内临时文件名的序号
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// 条目旁的临时文件：`{entry}.{pid}.{seq}.tmp`
///
/// 每次写入使用不同的文件名，同一个键的并发写入互不干扰
fn tmp_path(path: &Path) -> PathBuf {
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}.{}.tmp", std::process::id(), seq));
    PathBuf::from(name)
}

/// 缓存统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// 条目数量
    pub entries: u64,
    /// 总字节数
    pub total_bytes: u64,
}

/// 磁盘缓存存储
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    extension: &'static str,
}

impl CacheStore {
    pub fn new(root: PathBuf, extension: &'static str) -> Self {
        Self { root, extension }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 条目文件路径
    pub fn entry_path(&self, key: &str) -> PathBuf {
        CachePath::entry_path(&self.root, key, self.extension)
    }

    /// 读取缓存条目
    ///
    /// # 返回
    /// - `Ok(Some(bytes))`: 命中
    /// - `Ok(None)`: 文件不存在
    /// - `Err(CacheError::StoreRead)`: 其他读取错误
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::StoreRead { path, source }),
        }
    }

    /// 写入缓存条目
    ///
    /// 先写入同目录下的临时文件并刷盘，再重命名覆盖条目文件。
    /// 读取方只会看到旧内容或完整的新内容；写入失败时清理临时文件，条目保持原样。
    pub async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let tmp = tmp_path(&path);

        let result = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp, &path).await
        }
        .await;

        match result {
            Ok(()) => {
                debug!("缓存已写入: {:?} ({} 字节)", path, bytes.len());
                Ok(())
            }
            Err(source) => {
                let _ = fs::remove_file(&tmp).await;
                Err(CacheError::StoreWrite { path, source })
            }
        }
    }

    /// 删除缓存条目，文件不存在时不报错
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("缓存已删除: {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::StoreWrite { path, source }),
        }
    }

    /// 条目文件是否存在
    pub async fn contains(&self, key: &str) -> Result<bool, CacheError> {
        let path = self.entry_path(key);
        fs::try_exists(&path)
            .await
            .map_err(|source| CacheError::StoreRead { path, source })
    }

    /// 统计根目录下本存储扩展名的条目
    ///
    /// 只统计根目录这一层，不进入子目录（Lottie 子目录单独统计）
    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        let read_err = |source| CacheError::StoreRead {
            path: self.root.clone(),
            source,
        };

        let mut stats = CacheStats::default();
        let mut entries = fs::read_dir(&self.root).await.map_err(read_err)?;

        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension) {
                continue;
            }
            let metadata = entry.metadata().await.map_err(read_err)?;
            if metadata.is_file() {
                stats.entries += 1;
                stats.total_bytes += metadata.len();
            }
        }

        Ok(stats)
    }
}
