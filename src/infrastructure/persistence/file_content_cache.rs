//! File-based Content Cache Implementation
//!
//! 每个条目是工作目录下的一个文本文件，文件名由 `CacheKey::file_name` 决定

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use super::write_atomic;
use crate::application::ports::{CacheError, CacheKey, CacheStats, ContentCachePort};

/// 文件内容缓存
///
/// 不同 key 对应不同文件，多个 worker 并发读写互不影响
pub struct FileContentCache {
    dir: PathBuf,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    write_count: AtomicU64,
}

impl FileContentCache {
    /// 创建缓存，目录不存在时自动创建
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| CacheError::IoError(format!("{}: {}", dir.display(), e)))?;

        tracing::debug!(dir = %dir.display(), "Content cache opened");

        Ok(Self {
            dir,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            write_count: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 条目文件路径
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

#[async_trait]
impl ContentCachePort for FileContentCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let path = self.entry_path(key);

        match fs::read_to_string(&path).await {
            Ok(content) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(content.trim().to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Cache miss");
                Ok(None)
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(CacheError::InvalidEntry {
                key: key.to_string(),
                message: e.to_string(),
            }),
            Err(e) => Err(CacheError::IoError(format!("{}: {}", path.display(), e))),
        }
    }

    async fn put(&self, key: &CacheKey, content: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key);

        write_atomic(&path, content.as_bytes())
            .await
            .map_err(|e| CacheError::IoError(format!("{}: {}", path.display(), e)))?;

        self.write_count.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, size = content.len(), "Cache entry written");
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            write_count: self.write_count.load(Ordering::Relaxed),
        }
    }
}
