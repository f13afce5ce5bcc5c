//! Concat Muxer - 按字节直接拼接
//!
//! 读取与 ffmpeg 相同格式的清单，把各文件内容依次写入输出。
//! 相对路径和 ffmpeg 一样按清单所在目录解析。
//! 用于测试和没有 ffmpeg 的离线运行。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{AudioMuxerPort, MuxerError};
use crate::infrastructure::persistence::write_atomic;

/// 解析清单：每行 `file '<path>'`，路径中的 `'` 写作 `'\''`
pub fn parse_manifest(manifest: &str) -> Result<Vec<PathBuf>, MuxerError> {
    manifest
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.strip_prefix("file '")
                .and_then(|rest| rest.strip_suffix('\''))
                .map(|quoted| PathBuf::from(quoted.replace("'\\''", "'")))
                .ok_or_else(|| MuxerError::InvalidManifest(line.to_string()))
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConcatMuxer;

impl ConcatMuxer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioMuxerPort for ConcatMuxer {
    async fn concat(&self, manifest_path: &Path, output_path: &Path) -> Result<(), MuxerError> {
        let manifest = fs::read_to_string(manifest_path)
            .await
            .map_err(|e| MuxerError::IoError(format!("{}: {}", manifest_path.display(), e)))?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        let inputs: Vec<PathBuf> = parse_manifest(&manifest)?
            .into_iter()
            .map(|input| base.join(input))
            .collect();
        if inputs.is_empty() {
            return Err(MuxerError::InvalidManifest("no input files".to_string()));
        }

        let mut joined = Vec::new();
        for input in &inputs {
            let data = fs::read(input)
                .await
                .map_err(|e| MuxerError::IoError(format!("{}: {}", input.display(), e)))?;
            joined.extend_from_slice(&data);
        }

        write_atomic(output_path, &joined)
            .await
            .map_err(|e| MuxerError::IoError(format!("{}: {}", output_path.display(), e)))?;

        tracing::debug!(inputs = inputs.len(), bytes = joined.len(), "Concatenated audio");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_unescapes_quotes() {
        let paths =
            parse_manifest("file '/w/1. Origins.mp3'\nfile '/w/Marcus'\\'' notes.mp3'\n").unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/w/1. Origins.mp3"),
                PathBuf::from("/w/Marcus' notes.mp3")
            ]
        );
    }

    #[test]
    fn test_parse_manifest_rejects_garbage() {
        assert!(matches!(
            parse_manifest("/w/a.mp3"),
            Err(MuxerError::InvalidManifest(_))
        ));
    }

    #[tokio::test]
    async fn test_relative_entries_resolve_against_manifest_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("parts")).unwrap();
        std::fs::write(dir.path().join("parts/a.mp3"), b"AAA").unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"BBB").unwrap();
        let manifest = dir.path().join("concat.list");
        std::fs::write(&manifest, "file 'parts/a.mp3'\nfile 'b.mp3'\n").unwrap();

        let output = dir.path().join("out.mp3");
        ConcatMuxer::new().concat(&manifest, &output).await.unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"AAABBB");
    }

    #[tokio::test]
    async fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("concat.list");
        std::fs::write(&manifest, "file '/definitely/missing.mp3'\n").unwrap();

        let err = ConcatMuxer::new()
            .concat(&manifest, &dir.path().join("out.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, MuxerError::IoError(_)));
    }
}
