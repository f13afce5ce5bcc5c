//! OpenAI Speech Client - 调用 OpenAI 兼容的语音合成接口
//!
//! 实现 SpeechSynthesisPort trait
//!
//! 外部 API:
//! POST {base_url}/audio/speech
//! Request: {"model": "tts-1", "input": "...", "voice": "alloy", "response_format": "mp3"}  (JSON)
//! Response: 音频二进制流

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SpeechError, SpeechSynthesisPort, SYNTHESIS_CEILING};

/// 语音合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeechHttpRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// 语音合成客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiSpeechConfig {
    /// 服务基础 URL（含 `/v1`）
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// 输出音频格式
    pub format: String,
    /// 请求超时时间（秒），0 表示不限制
    pub timeout_secs: u64,
}

impl Default for OpenAiSpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "tts-1".to_string(),
            format: "mp3".to_string(),
            timeout_secs: 0,
        }
    }
}

/// OpenAI 语音合成客户端
pub struct OpenAiSpeechClient {
    client: Client,
    config: OpenAiSpeechConfig,
}

impl OpenAiSpeechClient {
    pub fn new(config: OpenAiSpeechConfig) -> Result<Self, SpeechError> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| SpeechError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechSynthesisPort for OpenAiSpeechClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeechError> {
        let length = text.chars().count();
        if length > SYNTHESIS_CEILING {
            return Err(SpeechError::InputTooLong {
                length,
                ceiling: SYNTHESIS_CEILING,
            });
        }

        let request = SpeechHttpRequest {
            model: &self.config.model,
            input: text,
            voice,
            response_format: &self.config.format,
        };

        tracing::debug!(
            url = %self.speech_url(),
            text_len = length,
            voice = %voice,
            "Sending speech request"
        );

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechError::Timeout
                } else if e.is_connect() {
                    SpeechError::NetworkError(format!("Cannot connect to speech service: {}", e))
                } else {
                    SpeechError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpeechError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let mut audio_data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {}", e)))?;
            audio_data.extend_from_slice(&chunk);
        }

        if audio_data.is_empty() {
            return Err(SpeechError::InvalidResponse("empty audio body".to_string()));
        }

        tracing::debug!(audio_size = audio_data.len(), voice = %voice, "Speech synthesis completed");
        Ok(audio_data)
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
