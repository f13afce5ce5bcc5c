//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod console;
pub mod llm;
pub mod muxer;
pub mod storage;
pub mod tts;

pub use console::*;
pub use llm::*;
pub use muxer::*;
pub use storage::*;
pub use tts::*;
