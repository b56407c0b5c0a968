//! LLM 客户端抽象与实现（OpenAI 兼容 / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use traits::{ChatOutcome, LlmClient, ToolCallRequest};

use crate::config::AppConfig;

/// 按配置创建 LLM 客户端：provider = openai / mock（mock 用于无 Key 的本地体验与测试）
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    match cfg.llm.provider.as_str() {
        "mock" => Arc::new(MockLlmClient::new()),
        other => {
            if other != "openai" {
                tracing::warn!(provider = %other, "unknown llm provider, falling back to openai");
            }
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                cfg.llm.api_key.as_deref(),
                cfg.llm.temperature,
                cfg.llm.max_reply_tokens,
            ))
        }
    }
}
