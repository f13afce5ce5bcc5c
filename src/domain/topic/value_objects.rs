//! Topic Context - Value Objects

use serde::{Deserialize, Serialize};

use super::TopicError;
use crate::domain::sanitize_file_name;

/// 主题最小字符数
pub const MIN_TOPIC_CHARS: usize = 2;

/// 主题
///
/// 不变量:
/// - 单行、非空、至少两个字符
/// - 无首尾空白
/// - 不被成对的引号包裹
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// 校验并创建主题，返回第一个违反的约束
    pub fn parse(topic: impl Into<String>) -> Result<Self, TopicError> {
        let topic = topic.into();
        if topic.is_empty() {
            return Err(TopicError::Empty);
        }
        if topic != topic.trim() {
            return Err(TopicError::SurroundingWhitespace);
        }
        if topic.chars().count() < MIN_TOPIC_CHARS {
            return Err(TopicError::TooShort);
        }
        if topic.lines().count() > 1 {
            return Err(TopicError::MultiLine);
        }
        let first = topic.chars().next();
        let last = topic.chars().last();
        if first == last && matches!(first, Some('\'') | Some('"')) {
            return Err(TopicError::Quoted);
        }
        Ok(Self(topic))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 主题工作目录名
    pub fn dir_name(&self) -> String {
        sanitize_file_name(&self.0)
    }
}

impl TryFrom<String> for Topic {
    type Error = TopicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_topic() {
        let topic = Topic::parse("Stoicism").unwrap();
        assert_eq!(topic.as_str(), "Stoicism");
        assert_eq!(topic.dir_name(), "Stoicism");
    }

    #[test]
    fn test_invalid_topics() {
        assert_eq!(Topic::parse(""), Err(TopicError::Empty));
        assert_eq!(Topic::parse(" Stoicism"), Err(TopicError::SurroundingWhitespace));
        assert_eq!(Topic::parse("A"), Err(TopicError::TooShort));
        assert_eq!(Topic::parse("Line one\r\nline two"), Err(TopicError::MultiLine));
        assert_eq!(Topic::parse("\"Stoicism\""), Err(TopicError::Quoted));
        assert_eq!(Topic::parse("'Stoicism'"), Err(TopicError::Quoted));
    }

    #[test]
    fn test_partial_quotes_allowed() {
        assert!(Topic::parse("\"Meditations\" by Marcus Aurelius").is_ok());
    }

    #[test]
    fn test_dir_name_is_sanitized() {
        let topic = Topic::parse("TCP/IP: a history").unwrap();
        assert_eq!(topic.dir_name(), "TCP_IP_ a history");
    }
}
