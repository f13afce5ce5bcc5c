//! Voice Context - 音色
//!
//! 职责:
//! - 支持的音色枚举（规范 key 与服务端音色名的对应关系）
//! - 模型推荐结果的容错解析

mod value_objects;

pub use value_objects::{normalize_voice_response, VoiceProfile};
