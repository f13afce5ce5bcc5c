//! 文件名清理与校验
//!
//! 生成在主流平台上都合法的文件名（主题工作目录、缓存条目、音频片段）

use thiserror::Error;

/// 文件名最大字节数
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// 替换字符
const REPLACEMENT: char = '_';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileNameError {
    #[error("File name is empty")]
    Empty,

    #[error("File name is not filesystem-safe: {0:?}")]
    Unsafe(String),
}

#[inline]
fn is_reserved(ch: char) -> bool {
    matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || ch.is_control()
}

/// 清理文件名
///
/// - 保留字符和控制字符替换为 `_`
/// - 去掉结尾的 `.` 和空格（Windows 不允许）
/// - 按字符边界截断到 255 字节
/// - 空名、`.`、`..` 变为 `_`
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|ch| if is_reserved(ch) { REPLACEMENT } else { ch })
        .collect();

    let mut sanitized = String::with_capacity(replaced.len());
    for ch in replaced.chars() {
        if sanitized.len() + ch.len_utf8() > MAX_FILE_NAME_BYTES {
            break;
        }
        sanitized.push(ch);
    }

    let trimmed = sanitized.trim_end_matches(['.', ' ']);
    match trimmed {
        "" | "." | ".." => REPLACEMENT.to_string(),
        other => other.to_string(),
    }
}

/// 文件名中标题部分的最大字节数（为哈希、序号和扩展名预留空间）
pub const MAX_TITLE_BYTES: usize = 160;

/// 按字符边界截断到不超过 `max_bytes` 字节
pub fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// 校验文件名：清理后必须保持不变
pub fn validate_file_name(name: &str) -> Result<(), FileNameError> {
    if name.is_empty() {
        return Err(FileNameError::Empty);
    }
    if sanitize_file_name(name) != name {
        return Err(FileNameError::Unsafe(name.to_string()));
    }
    Ok(())
}
