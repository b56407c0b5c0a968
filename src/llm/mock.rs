//! Mock LLM 客户端（用于测试与无 API Key 的本地运行）
//!
//! 按预设脚本依次吐出 ChatOutcome（文本回复或工具调用请求），脚本耗尽后回复固定文本，
//! 便于离线跑通整个工具调用循环。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{ChatOutcome, LlmClient, ToolCallRequest};
use crate::memory::Message;
use crate::tools::ToolDescriptor;

/// Mock 客户端：依序回放脚本中的 ChatOutcome
#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<ChatOutcome>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按给定脚本创建（先入先出）
    pub fn with_script(outcomes: Vec<ChatOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
        }
    }

    /// 构造一条文本回复脚本项
    pub fn reply(text: impl Into<String>) -> ChatOutcome {
        ChatOutcome::Reply(text.into())
    }

    /// 构造一条工具调用脚本项（自动生成调用 id）
    pub fn tool_call(name: impl Into<String>, arguments: impl Into<String>) -> ChatOutcome {
        ChatOutcome::ToolCalls(vec![ToolCallRequest {
            id: format!("call_{}", uuid::Uuid::new_v4().simple()),
            name: name.into(),
            arguments: arguments.into(),
        }])
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat(
        &self,
        _messages: &[Message],
        _tools: &[ToolDescriptor],
    ) -> Result<ChatOutcome, String> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| "mock script lock poisoned".to_string())?;
        Ok(script.pop_front().unwrap_or_else(|| {
            ChatOutcome::Reply("(mock) no scripted reply left".to_string())
        }))
    }
}
