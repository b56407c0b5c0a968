//! 记忆层：对话历史（user/assistant，工具往返不落入）

pub mod conversation;

pub use conversation::{ConversationMemory, Message, Role};
