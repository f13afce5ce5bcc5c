//! Console Adapter - 终端交互

mod stdin_confirmer;

pub use stdin_confirmer::StdinConfirmer;
