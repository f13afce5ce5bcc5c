//! Section Content Generator - 章节正文生成

use std::sync::Arc;

use super::content_generator::{ContentGenerator, GenerationStrategy};
use crate::application::error::PipelineError;
use crate::application::ports::SYNTHESIS_CEILING;
use crate::application::prompts::section_prompt;
use crate::domain::{longest_paragraph, Outline, SectionHeading, Topic};

/// 默认尝试次数
pub const DEFAULT_SECTION_ATTEMPTS: usize = 3;

/// 代码块标记
const CODE_FENCE: &str = "```";

/// 校验章节正文，返回第一个问题
pub fn validate_section_text(text: &str) -> Result<(), String> {
    if text.is_empty() {
        return Err("text is empty".to_string());
    }
    if text != text.trim() {
        return Err("text has leading or trailing whitespace".to_string());
    }
    if text.starts_with(CODE_FENCE) {
        return Err("text opens with a fenced code block".to_string());
    }
    let longest = longest_paragraph(text);
    if longest > SYNTHESIS_CEILING {
        return Err(format!(
            "a paragraph has {} characters, exceeding the synthesis ceiling of {}",
            longest, SYNTHESIS_CEILING
        ));
    }
    Ok(())
}

pub struct SectionGenerator {
    content: Arc<ContentGenerator>,
    max_attempts: usize,
}

impl SectionGenerator {
    pub fn new(content: Arc<ContentGenerator>) -> Self {
        Self {
            content,
            max_attempts: DEFAULT_SECTION_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// 生成一个章节的完整正文
    ///
    /// 缓存标签为章节标题（如 `1. Origins`），每个章节独立缓存、可单独恢复
    pub async fn generate(
        &self,
        topic: &Topic,
        outline: &Outline,
        heading: &SectionHeading,
        strategy: GenerationStrategy,
    ) -> Result<String, PipelineError> {
        let with_continuation = strategy == GenerationStrategy::MultiShot;
        let prompt = section_prompt(topic, outline, heading, with_continuation);
        let label = heading.to_string();

        for attempt in 1..=self.max_attempts {
            let text = self
                .content
                .get_cached(&prompt, &label, strategy, attempt == 1)
                .await?;

            match validate_section_text(&text) {
                Ok(()) => {
                    tracing::debug!(
                        section = %label,
                        chars = text.chars().count(),
                        attempt = attempt,
                        "Section generated"
                    );
                    return Ok(text);
                }
                Err(problem) if attempt < self.max_attempts => {
                    tracing::warn!(section = %label, attempt = attempt, problem = %problem, "Retrying section generation");
                }
                Err(problem) => {
                    tracing::error!(section = %label, attempt = attempt, problem = %problem, "Section generation failed");
                    return Err(PipelineError::structure(format!(
                        "Invalid text for section {}: {}",
                        label, problem
                    )));
                }
            }
        }

        Err(PipelineError::Invariant(
            "section generation made no attempts".to_string(),
        ))
    }
}
