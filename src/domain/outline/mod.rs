//! Outline Context - 章节大纲
//!
//! 职责:
//! - 编号章节标题的结构校验
//! - 大纲的有序表示

mod errors;
mod value_objects;

pub use errors::OutlineViolation;
pub use value_objects::{is_outline_valid, Outline, SectionHeading};
