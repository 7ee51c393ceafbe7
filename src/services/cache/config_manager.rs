// 配置管理器 - 管理缓存配置的读写
//
// 本模块提供缓存配置的持久化管理功能，包括：
// - 从 JSON 文件加载配置
// - 保存配置到 JSON 文件
// - 环境变量覆盖缓存目录

use crate::services::cache::{CacheConfig, CacheError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// 配置管理器
///
/// 负责管理缓存配置的读写，使用 Arc<RwLock> 保证线程安全
pub struct ConfigManager {
    /// 配置文件路径
    config_path: PathBuf,

    /// 缓存配置（使用读写锁保证线程安全）
    config: Arc<RwLock<CacheConfig>>,
}

impl ConfigManager {
    /// 默认配置文件路径
    const DEFAULT_CONFIG_PATH: &'static str = "cache_config.json";

    /// 覆盖缓存目录的环境变量
    pub const CACHE_DIR_ENV: &'static str = "MEDIA_CACHE_DIR";

    /// 从配置文件加载配置
    ///
    /// # 参数
    /// - `config_path`: 可选的配置文件路径，如果为 None 则使用默认路径
    ///
    /// # 行为
    /// - 如果配置文件不存在，使用默认配置并创建文件
    /// - 如果配置文件损坏，使用默认配置并备份旧文件
    /// - 环境变量 `MEDIA_CACHE_DIR` 非空时覆盖 `cache_dir`（不写回文件）
    ///
    /// # 示例
    /// ```no_run
    /// use network_media_cache::services::cache::ConfigManager;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = ConfigManager::load(None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(config_path: Option<PathBuf>) -> Result<Self, CacheError> {
        let env_cache_dir = std::env::var(Self::CACHE_DIR_ENV).ok();
        Self::load_with_cache_dir(config_path, env_cache_dir).await
    }

    /// 加载配置，并用给定目录覆盖 `cache_dir`
    pub async fn load_with_cache_dir(
        config_path: Option<PathBuf>,
        cache_dir_override: Option<String>,
    ) -> Result<Self, CacheError> {
        let config_path = config_path
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            match fs::read_to_string(&config_path).await {
                Ok(content) => match serde_json::from_str::<CacheConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("成功加载缓存配置: {:?}", config_path);
                        config
                    }
                    Err(e) => {
                        // 配置文件损坏，备份并使用默认配置
                        tracing::warn!("配置文件损坏，使用默认配置: {}", e);
                        Self::backup_corrupted_config(&config_path).await;
                        CacheConfig::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("读取配置文件失败，使用默认配置: {}", e);
                    CacheConfig::default()
                }
            }
        } else {
            tracing::info!("配置文件不存在，使用默认配置");
            CacheConfig::default()
        };

        let manager = Self {
            config_path,
            config: Arc::new(RwLock::new(config)),
        };

        // 保存默认配置到文件
        if !manager.config_path.exists() {
            manager.save().await?;
        }

        if let Some(dir) = cache_dir_override.filter(|d| !d.is_empty()) {
            tracing::info!("使用环境变量指定的缓存目录: {}", dir);
            manager.config.write().await.cache_dir = Some(PathBuf::from(dir));
        }

        Ok(manager)
    }

    /// 保存配置到文件
    pub async fn save(&self) -> Result<(), CacheError> {
        let config = self.config.read().await;

        // 序列化配置为 JSON（格式化输出）
        let json = serde_json::to_string_pretty(&*config)?;

        // 确保父目录存在
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    CacheError::Config(format!("创建配置目录失败: {}", e))
                })?;
            }
        }

        fs::write(&self.config_path, json).await.map_err(|e| {
            CacheError::Config(format!("写入配置文件失败: {}", e))
        })?;

        tracing::info!("成功保存缓存配置: {:?}", self.config_path);
        Ok(())
    }

    /// 获取完整配置（克隆）
    pub async fn get_config(&self) -> CacheConfig {
        self.config.read().await.clone()
    }

    /// 配置文件路径
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 备份损坏的配置文件，失败不影响主流程
    async fn backup_corrupted_config(config_path: &Path) {
        let backup_path = config_path.with_extension("json.backup");

        match fs::rename(config_path, &backup_path).await {
            Ok(_) => tracing::info!("已备份损坏的配置文件到: {:?}", backup_path),
            Err(e) => tracing::warn!("备份配置文件失败: {}", e),
        }
    }
}
