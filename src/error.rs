//! 错误类型
//!
//! 工具与领域层的失败全部封装为 ToolResultEnvelope 回流给模型，不出现在这里；
//! 只有模型调用失败与配置错误会作为 CrucibleError 上抛给调用方。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrucibleError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Config error: {0}")]
    Config(String),
}
