//! 文本分割器
//!
//! 按段落切分长文本，保证每个片段不超过字符上限，且不拆分任何段落

use thiserror::Error;

/// 段落分隔符（空行）
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// 分割错误
///
/// 调用方必须保证单个段落不超过上限，违反时视为不可恢复的错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("Segment limit must be greater than zero")]
    ZeroLimit,

    #[error("Paragraph {index} has {length} characters, exceeding the limit of {limit}")]
    ParagraphTooLong {
        index: usize,
        length: usize,
        limit: usize,
    },
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 按空行拆分段落
///
/// 连续多个空行视为一个分隔，空白段落被丢弃
fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split(PARAGRAPH_SEPARATOR)
        .map(|paragraph| paragraph.trim_matches('\n'))
        .filter(|paragraph| !paragraph.trim().is_empty())
        .collect()
}

/// 按段落对文本进行分段
///
/// 分段策略：
/// 1. 空白文本不产生片段
/// 2. 文本整体不超过 `limit` 时原样返回
/// 3. 否则按空行拆成段落，贪心合并段落，合并后超出上限时开启新片段
///
/// 结果中不会出现空白片段。
pub fn segment_by_paragraphs(text: &str, limit: usize) -> Result<Vec<String>, SegmentError> {
    if limit == 0 {
        return Err(SegmentError::ZeroLimit);
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    if char_len(text) <= limit {
        return Ok(vec![text.to_string()]);
    }

    let paragraphs = split_paragraphs(text);
    for (index, paragraph) in paragraphs.iter().enumerate() {
        let length = char_len(paragraph);
        if length > limit {
            return Err(SegmentError::ParagraphTooLong {
                index,
                length,
                limit,
            });
        }
    }

    let separator_len = char_len(PARAGRAPH_SEPARATOR);
    let mut segments: Vec<String> = Vec::new();
    // (内容, 字符数)
    let mut current: Option<(String, usize)> = None;

    for paragraph in paragraphs {
        let paragraph_len = char_len(paragraph);
        current = Some(match current.take() {
            None => (paragraph.to_string(), paragraph_len),
            Some((mut buffer, buffer_len)) => {
                let candidate_len = buffer_len + separator_len + paragraph_len;
                if candidate_len > limit {
                    segments.push(buffer);
                    (paragraph.to_string(), paragraph_len)
                } else {
                    buffer.push_str(PARAGRAPH_SEPARATOR);
                    buffer.push_str(paragraph);
                    (buffer, candidate_len)
                }
            }
        });
    }

    if let Some((buffer, _)) = current {
        segments.push(buffer);
    }

    Ok(segments)
}

/// 返回文本中最长段落的字符数
pub fn longest_paragraph(text: &str) -> usize {
    split_paragraphs(text)
        .into_iter()
        .map(char_len)
        .max()
        .unwrap_or(0)
}
