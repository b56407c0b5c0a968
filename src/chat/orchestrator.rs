//! 对话编排器：工具调用主循环
//!
//! submit 单轮流程：user 入历史 -> 拼单轮会话（system + 历史）-> 最多 3 次模型调用；
//! 模型请求工具则解析参数、经注册表执行、调用与结果信封写回会话后继续；
//! 模型给出文本则落历史并返回。循环耗尽返回固定兜底文案（历史只留 user，不补 assistant）。

use std::sync::Arc;

use serde_json::Value;

use crate::error::CrucibleError;
use crate::llm::{ChatOutcome, LlmClient};
use crate::memory::{ConversationMemory, Message};
use crate::tools::{ToolRegistry, ToolResultEnvelope};

/// 单轮对话内最大模型调用次数，防止工具调用死循环
const MAX_TOOL_ITERATIONS: usize = 3;

/// 循环耗尽时的固定兜底回复
pub const FALLBACK_REPLY: &str =
    "I apologize, but I had trouble processing that request. Could you rephrase?";

/// 默认系统提示词（可由配置 [app].system_prompt 覆盖）
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are CRUCIBLE, a material science assistant that helps identify materials from spectroscopic data.

Your main capability is identifying materials using Raman spectroscopy data. You have access to a tool called 'identify_material' that requires three parameters:
- peak_1: First Raman peak in cm^-1
- peak_2: Second Raman peak in cm^-1
- formation_energy: Formation energy in eV/atom

When users provide this data, use the tool to identify the material. If data is missing, politely ask for it.

Be concise, scientific, and helpful. Explain your identifications briefly.";

/// 编排器：持有 LLM 客户端、工具注册表与独占的对话历史。
/// 每个实例一条独立对话，可并存多个实例互不影响。
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    history: ConversationMemory,
    system_prompt: String,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        system_prompt: impl Into<String>,
        max_context_turns: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            history: ConversationMemory::new(max_context_turns),
            system_prompt: system_prompt.into(),
        }
    }

    /// 处理单条用户输入，返回最终回复文本。
    /// 空输入由调用方过滤，此处不校验。仅模型调用失败会返回 Err。
    pub async fn submit(&mut self, user_text: &str) -> Result<String, CrucibleError> {
        self.history.push(Message::user(user_text));

        // 单轮会话：system + 完整历史；工具往返只写入会话，循环结束即丢弃
        let mut session: Vec<Message> = Vec::with_capacity(self.history.len() + 1);
        session.push(Message::system(&self.system_prompt));
        session.extend_from_slice(self.history.messages());

        let catalog = self.tools.descriptors();

        for iteration in 0..MAX_TOOL_ITERATIONS {
            let outcome = self
                .llm
                .chat(&session, &catalog)
                .await
                .map_err(CrucibleError::Llm)?;

            match outcome {
                ChatOutcome::ToolCalls(calls) => {
                    // 只接受首个调用请求，多余的静默忽略（单工具系统的既定简化）
                    if calls.len() > 1 {
                        tracing::debug!(dropped = calls.len() - 1, "extra tool calls ignored");
                    }
                    let Some(call) = calls.into_iter().next() else {
                        continue;
                    };
                    tracing::info!(
                        iteration,
                        tool = %call.name,
                        args = %call.arguments,
                        "tool call requested"
                    );

                    let envelope = match serde_json::from_str::<Value>(&call.arguments) {
                        Ok(args) => self.tools.execute(&call.name, args).await,
                        Err(e) => ToolResultEnvelope::failure(format!(
                            "Invalid tool arguments: {e}"
                        )),
                    };
                    tracing::info!(tool = %call.name, result = %envelope.to_payload(), "tool result");

                    let call_id = call.id.clone();
                    session.push(Message::assistant_tool_call(call));
                    session.push(Message::tool(call_id, envelope.to_payload()));
                }
                ChatOutcome::Reply(text) => {
                    self.history.push(Message::assistant(&text));
                    return Ok(text);
                }
            }
        }

        // 循环耗尽：返回兜底文案，历史保留 user 不补 assistant（允许用户原地重试）
        tracing::warn!(max = MAX_TOOL_ITERATIONS, "tool loop exhausted without final reply");
        Ok(FALLBACK_REPLY.to_string())
    }

    /// 清空对话历史，任意时刻可调用
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[Message] {
        self.history.messages()
    }
}
