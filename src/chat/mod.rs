//! 对话编排：工具调用主循环与系统提示词

pub mod orchestrator;

pub use orchestrator::{Orchestrator, DEFAULT_SYSTEM_PROMPT, FALLBACK_REPLY};
