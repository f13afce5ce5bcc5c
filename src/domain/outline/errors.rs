//! Outline Context - Errors

use thiserror::Error;

/// 大纲结构违规（只报告第一个）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutlineViolation {
    #[error("Outline is empty")]
    Empty,

    #[error("Section {position} has leading or trailing whitespace: {line:?}")]
    StrayWhitespace { position: usize, line: String },

    #[error("Section {position} is not numbered correctly: {line}")]
    BadNumbering { position: usize, line: String },

    #[error("Section {position} has no name: {line}")]
    EmptyName { position: usize, line: String },

    #[error("Section {position} is a duplicate: {line}")]
    DuplicateName { position: usize, line: String },

    #[error("Outline has {count} sections, exceeding the limit of {max}")]
    TooManySections { count: usize, max: usize },
}
