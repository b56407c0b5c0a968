//! CRUCIBLE - 材料识别对话助手
//!
//! 模块划分：
//! - **chat**: 对话编排器（工具调用主循环、历史维护）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **error**: 错误类型（仅模型调用与配置失败上抛）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **materials**: 材料识别领域函数（参考库最近邻匹配）
//! - **memory**: 对话历史（user/assistant）
//! - **tools**: 工具 trait、注册表、结果信封与 identify_material 适配器

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod materials;
pub mod memory;
pub mod observability;
pub mod tools;
