//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Mock）实现 LlmClient：chat 接收消息序列与工具目录，
//! 返回最终文本或结构化的工具调用请求。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::memory::Message;
use crate::tools::ToolDescriptor;

/// 模型返回的单个工具调用请求：调用 id、工具名、未解析的参数文本（JSON 编码）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// 单次模型调用的结果：最终文本回复，或一组工具调用请求
#[derive(Clone, Debug)]
pub enum ChatOutcome {
    Reply(String),
    ToolCalls(Vec<ToolCallRequest>),
}

/// LLM 客户端 trait：带工具目录的单次完成
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 单次完成：tools 为向模型公开的工具目录，工具选择模式为 auto
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<ChatOutcome, String>;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
