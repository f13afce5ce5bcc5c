//! Fake Speech Client - 用于测试和离线运行的语音合成客户端
//!
//! 不调用外部服务，按文本生成确定性的字节并记录调用

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{SpeechError, SpeechSynthesisPort, SYNTHESIS_CEILING};

/// Fake Speech Client
///
/// 输出为 `[voice] text\n` 的 UTF-8 字节，便于断言拼接结果
#[derive(Debug, Default)]
pub struct FakeSpeechClient {
    calls: AtomicUsize,
    voices: Mutex<Vec<String>>,
}

impl FakeSpeechClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已发生的合成调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 每次调用使用的音色，按调用顺序
    pub fn voices(&self) -> Vec<String> {
        self.voices
            .lock()
            .map(|voices| voices.clone())
            .unwrap_or_default()
    }

    /// 某段文本对应的输出字节
    pub fn render(text: &str, voice: &str) -> Vec<u8> {
        format!("[{}] {}\n", voice, text).into_bytes()
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeSpeechClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let length = text.chars().count();
        if length > SYNTHESIS_CEILING {
            return Err(SpeechError::InputTooLong {
                length,
                ceiling: SYNTHESIS_CEILING,
            });
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut voices) = self.voices.lock() {
            voices.push(voice.to_string());
        }

        tracing::debug!(text_len = length, voice = %voice, "FakeSpeechClient: rendering text");
        Ok(Self::render(text, voice))
    }

    fn model_id(&self) -> &str {
        "fake-speech"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let client = FakeSpeechClient::new();
        let audio = client.synthesize("Hello.", "nova").await.unwrap();
        assert_eq!(audio, b"[nova] Hello.\n");
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.voices(), vec!["nova".to_string()]);
    }

    #[tokio::test]
    async fn test_enforces_ceiling() {
        let client = FakeSpeechClient::new();
        let text = "é".repeat(SYNTHESIS_CEILING + 1);
        assert!(matches!(
            client.synthesize(&text, "nova").await,
            Err(SpeechError::InputTooLong { .. })
        ));
        assert_eq!(client.call_count(), 0);
    }
}
