//! Domain Layer - 领域层
//!
//! 包含三个上下文:
//! - Topic: 主题校验
//! - Outline: 章节大纲
//! - Voice: 音色选择
//!
//! 以及共享的纯函数：段落分割器、文件名清理

pub mod outline;
pub mod topic;
pub mod voice;

mod file_name;
mod text_segmenter;

pub use file_name::{
    sanitize_file_name, truncate_on_char_boundary, validate_file_name, FileNameError,
    MAX_FILE_NAME_BYTES, MAX_TITLE_BYTES,
};
pub use outline::{is_outline_valid, Outline, OutlineViolation, SectionHeading};
pub use text_segmenter::{longest_paragraph, segment_by_paragraphs, SegmentError, PARAGRAPH_SEPARATOR};
pub use topic::{Topic, TopicError};
pub use voice::VoiceProfile;
