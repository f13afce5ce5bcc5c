//! Topic Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopicError {
    #[error("No topic was provided.")]
    Empty,

    #[error("Topic must not have leading or trailing whitespace.")]
    SurroundingWhitespace,

    #[error("Topic must be at least two characters long.")]
    TooShort,

    #[error("Topic must be in a single line.")]
    MultiLine,

    #[error("Topic must not be quoted.")]
    Quoted,
}
