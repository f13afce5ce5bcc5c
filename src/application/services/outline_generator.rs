//! Outline Generator - 大纲生成
//!
//! 生成并校验主题的编号章节列表，失败时在次数上限内重试

use std::sync::Arc;

use super::content_generator::{ContentGenerator, GenerationStrategy};
use crate::application::error::PipelineError;
use crate::application::prompts::{outline_prompt, NONE_SENTINELS, REJECTION_PREFIX};
use crate::domain::{Outline, Topic};

/// 大纲的固定缓存标签
pub const OUTLINE_CACHE_LABEL: &str = "0. outline";

/// 默认尝试次数
pub const DEFAULT_OUTLINE_ATTEMPTS: usize = 2;

fn is_none_sentinel(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    NONE_SENTINELS.contains(&lower.as_str())
}

/// 单次尝试的结果
enum AttemptOutcome {
    Valid(Outline),
    NoSections,
    Rejected(String),
    Malformed(String),
}

pub struct OutlineGenerator {
    content: Arc<ContentGenerator>,
    max_attempts: usize,
}

impl OutlineGenerator {
    pub fn new(content: Arc<ContentGenerator>) -> Self {
        Self {
            content,
            max_attempts: DEFAULT_OUTLINE_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// 生成大纲
    ///
    /// 第一次尝试可读缓存，之后的尝试强制重新生成。
    /// 最后一次仍失败时：无章节/拒绝返回 `ContentRejection`，结构错误返回 `ContentStructure`。
    pub async fn generate(
        &self,
        topic: &Topic,
        max_sections: Option<usize>,
    ) -> Result<Outline, PipelineError> {
        let prompt = outline_prompt(topic, max_sections);

        for attempt in 1..=self.max_attempts {
            let is_final = attempt == self.max_attempts;
            let response = self
                .content
                .get_cached(
                    &prompt,
                    OUTLINE_CACHE_LABEL,
                    GenerationStrategy::OneShot,
                    attempt == 1,
                )
                .await?;

            let error = match Self::evaluate(&response, max_sections) {
                AttemptOutcome::Valid(outline) => {
                    tracing::info!(
                        topic = %topic,
                        sections = outline.len(),
                        attempt = attempt,
                        "Outline generated"
                    );
                    return Ok(outline);
                }
                AttemptOutcome::NoSections => PipelineError::ContentRejection(format!(
                    "No sections exist for topic: {}",
                    topic
                )),
                AttemptOutcome::Rejected(reason) => PipelineError::ContentRejection(reason),
                AttemptOutcome::Malformed(violation) => PipelineError::structure(format!(
                    "Invalid outline for topic {}: {}",
                    topic, violation
                )),
            };

            if is_final {
                tracing::error!(topic = %topic, attempt = attempt, error = %error, "Outline generation failed");
                return Err(error);
            }
            tracing::warn!(topic = %topic, attempt = attempt, error = %error, "Retrying outline generation");
        }

        Err(PipelineError::Invariant(
            "outline generation made no attempts".to_string(),
        ))
    }

    fn evaluate(response: &str, max_sections: Option<usize>) -> AttemptOutcome {
        if is_none_sentinel(response) {
            return AttemptOutcome::NoSections;
        }
        if let Some(reason) = response.strip_prefix(REJECTION_PREFIX) {
            return AttemptOutcome::Rejected(reason.trim().to_string());
        }

        let lines: Vec<&str> = response
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !is_none_sentinel(line))
            .collect();
        if lines.is_empty() {
            return AttemptOutcome::NoSections;
        }

        match Outline::from_lines(&lines, max_sections) {
            Ok(outline) => AttemptOutcome::Valid(outline),
            Err(violation) => AttemptOutcome::Malformed(violation.to_string()),
        }
    }
}
