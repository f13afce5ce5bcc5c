//! Topic Context - 主题
//!
//! 职责:
//! - 主题校验
//! - 主题工作目录命名

mod errors;
mod value_objects;

pub use errors::TopicError;
pub use value_objects::Topic;
