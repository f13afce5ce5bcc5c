//! Content Cache Port - 生成内容缓存
//!
//! 定义内容缓存的抽象接口，具体实现为主题工作目录下的文件

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{sanitize_file_name, truncate_on_char_boundary, MAX_TITLE_BYTES};

/// Content Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Invalid cache entry {key}: {message}")]
    InvalidEntry { key: String, message: String },
}

/// 缓存 key
///
/// 由清理后的标签、生成策略、模型标识和提示词的 md5 组成。
/// 相同标签、不同提示词得到不同的 key，互不覆盖。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub label: String,
    pub strategy: String,
    pub model: String,
    pub prompt_hash: String,
}

impl CacheKey {
    /// 条目文件名，如 `1. Origins [oneshot] [gpt-4o] 5d41402a....txt`
    pub fn file_name(&self) -> String {
        sanitize_file_name(&format!(
            "{} [{}] [{}] {}.txt",
            self.label, self.strategy, self.model, self.prompt_hash
        ))
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.label, self.strategy, self.model, self.prompt_hash
        )
    }
}

/// 生成缓存 key
///
/// 使用 md5(prompt) 作为内容哈希。标签截断到 [`MAX_TITLE_BYTES`]，
/// 保证文件名在 255 字节内仍保留哈希和扩展名。
pub fn generate_cache_key(label: &str, strategy: &str, model: &str, prompt: &str) -> CacheKey {
    let digest = md5::compute(prompt.as_bytes());
    let label = sanitize_file_name(label);
    CacheKey {
        label: sanitize_file_name(truncate_on_char_boundary(&label, MAX_TITLE_BYTES)),
        strategy: strategy.to_string(),
        model: sanitize_file_name(model),
        prompt_hash: format!("{:x}", digest),
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hit_count: u64,
    pub miss_count: u64,
    pub write_count: u64,
}

/// Content Cache Port
///
/// - 读取是纯查找，不做过期
/// - 写入覆盖旧条目
/// - 必须支持多个 worker 并发读写不同 key
#[async_trait]
pub trait ContentCachePort: Send + Sync {
    /// 读取条目（已去除首尾空白）
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;

    /// 写入原始内容
    async fn put(&self, key: &CacheKey, content: &str) -> Result<(), CacheError>;

    /// 获取缓存统计信息
    fn stats(&self) -> CacheStats;
}
