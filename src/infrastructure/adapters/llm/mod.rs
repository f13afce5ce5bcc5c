//! LLM Adapter - 文本生成客户端实现

mod fake_text_client;
mod openai_chat_client;
mod scripted_text_client;

pub use fake_text_client::FakeTextClient;
pub use openai_chat_client::{OpenAiChatClient, OpenAiChatConfig};
pub use scripted_text_client::ScriptedTextClient;
