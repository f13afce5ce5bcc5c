//! Scripted Text Client - 按预设脚本回复的文本生成客户端
//!
//! 用于测试：依次返回预设回复，并记录每次请求的消息历史

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::ports::{ChatMessage, TextGenerationError, TextGenerationPort};

pub struct ScriptedTextClient {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    model: String,
}

impl ScriptedTextClient {
    pub fn new(responses: impl IntoIterator<Item = String>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            model: "scripted".to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// 已发生的调用次数
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .map(|requests| requests.len())
            .unwrap_or_default()
    }

    /// 每次调用收到的消息历史
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// 尚未消费的回复数
    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .map(|responses| responses.len())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerationPort for ScriptedTextClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, TextGenerationError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let next = self
            .responses
            .lock()
            .map_err(|_| TextGenerationError::ServiceError("script poisoned".to_string()))?
            .pop_front();

        next.ok_or_else(|| TextGenerationError::ServiceError("script exhausted".to_string()))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
