//! Fake Text Client - 离线运行用的文本生成客户端
//!
//! 按请求类型返回固定内容，不调用外部服务

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{ChatMessage, TextGenerationError, TextGenerationPort};
use crate::application::prompts::continuation_prompt;

const OUTLINE_MARKER: &str = "List the sections";
const VOICE_MARKER: &str = "Choose the narration voice";

const FAKE_OUTLINE: &str = "1. Introduction\n2. Main Ideas\n3. Conclusion";
const FAKE_VOICE: &str = "neutral";
const FAKE_PARAGRAPH: &str =
    "This is placeholder narration produced without contacting a text generation service.";

#[derive(Debug, Default)]
pub struct FakeTextClient {
    calls: AtomicUsize,
}

impl FakeTextClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerationPort for FakeTextClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, TextGenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let last = messages
            .last()
            .ok_or_else(|| TextGenerationError::InvalidResponse("no messages".to_string()))?;

        let reply = if last.content == continuation_prompt() {
            "DONE"
        } else if last.content.contains(OUTLINE_MARKER) {
            FAKE_OUTLINE
        } else if last.content.contains(VOICE_MARKER) {
            FAKE_VOICE
        } else {
            FAKE_PARAGRAPH
        };

        tracing::debug!(messages = messages.len(), "FakeTextClient: returning fixed reply");
        Ok(reply.to_string())
    }

    fn model_id(&self) -> &str {
        "fake-text"
    }
}
