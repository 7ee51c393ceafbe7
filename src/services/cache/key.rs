// 缓存键生成
//
// 由 URL 生成文件系统安全、确定性的缓存键：
// - 主命名空间：URL 的 SHA-256 十六进制摘要
// - Lottie 命名空间：把文件名非法字符替换为 `_`，保留 URL 其余部分

use sha2::{Digest, Sha256};

/// 缓存命名空间
///
/// 每个命名空间有独立的目录段和键生成规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// 通用字节缓存（图片、SVG）
    Primary,

    /// 基于文件路径的缓存（Lottie 动画）
    Lottie,
}

/// 缓存键生成器
#[derive(Debug, Clone, Copy)]
pub struct KeyCodec;

impl KeyCodec {
    /// 文件名中不允许出现的字符
    const UNSAFE_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    /// 非法字符的替换字符
    const PLACEHOLDER: char = '_';

    /// 根据命名空间生成缓存键
    ///
    /// 纯函数：相同 URL 在任何进程中都得到相同的键。
    ///
    /// # 示例
    /// ```
    /// use network_media_cache::services::cache::{KeyCodec, Namespace};
    ///
    /// let key = KeyCodec::derive_key("https://x/anim.json", Namespace::Lottie);
    /// assert_eq!(key, "https___x_anim.json");
    /// ```
    pub fn derive_key(url: &str, namespace: Namespace) -> String {
        match namespace {
            Namespace::Primary => Self::hash_key(url),
            Namespace::Lottie => Self::sanitize(url),
        }
    }

    /// URL 的 SHA-256 摘要（64 位十六进制小写）
    ///
    /// 不检测碰撞：两个 URL 摘要相同时会互相覆盖。
    pub fn hash_key(url: &str) -> String {
        let digest = Sha256::digest(url.as_bytes());
        format!("{:x}", digest)
    }

    /// 替换 URL 中的文件名非法字符
    ///
    /// 除替换外原样保留 URL，不截断。多数文件系统限制单个文件名不超过 255 字节，
    /// 过长的 URL（如带签名参数的 CDN 地址）得到的文件名无法创建，
    /// 访问该条目时返回 `CacheError::StoreRead`。
    pub fn sanitize(url: &str) -> String {
        url.chars()
            .map(|c| {
                if Self::UNSAFE_CHARS.contains(&c) {
                    Self::PLACEHOLDER
                } else {
                    c
                }
            })
            .collect()
    }
}
