//! Voice Selector - 音色选择

use std::sync::Arc;

use super::content_generator::{ContentGenerator, GenerationStrategy};
use crate::application::error::PipelineError;
use crate::application::prompts::voice_prompt;
use crate::domain::{Topic, VoiceProfile};

/// 音色推荐的固定缓存标签
pub const VOICE_CACHE_LABEL: &str = "0. voice";

/// 默认尝试次数
pub const DEFAULT_VOICE_ATTEMPTS: usize = 3;

pub struct VoiceSelector {
    content: Arc<ContentGenerator>,
    max_attempts: usize,
}

impl VoiceSelector {
    pub fn new(content: Arc<ContentGenerator>) -> Self {
        Self {
            content,
            max_attempts: DEFAULT_VOICE_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// 为主题选择音色
    ///
    /// 无法解析时绕过缓存重试，用尽次数后返回 `Configuration` 错误
    pub async fn select(&self, topic: &Topic) -> Result<VoiceProfile, PipelineError> {
        let prompt = voice_prompt(topic);
        let mut last_response = String::new();

        for attempt in 1..=self.max_attempts {
            let response = self
                .content
                .get_cached(
                    &prompt,
                    VOICE_CACHE_LABEL,
                    GenerationStrategy::OneShot,
                    attempt == 1,
                )
                .await?;

            if let Some(voice) = VoiceProfile::resolve(&response) {
                tracing::info!(topic = %topic, voice = %voice, attempt = attempt, "Voice selected");
                return Ok(voice);
            }

            tracing::warn!(
                topic = %topic,
                attempt = attempt,
                response = %response,
                "Unrecognized voice recommendation"
            );
            last_response = response;
        }

        Err(PipelineError::configuration(format!(
            "Unable to resolve a voice for topic {} (last response: {:?}; supported: {})",
            topic,
            last_response,
            VoiceProfile::options_text()
        )))
    }
}
