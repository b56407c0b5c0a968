//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url），
//! 走原生 function calling：请求携带工具目录（tool_choice = auto），
//! 响应中的 tool_calls 转为 ToolCallRequest 交由编排层分发。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolChoiceOption,
    ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs,
    ToolChoiceOptions,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::{ChatOutcome, LlmClient, ToolCallRequest};
use crate::memory::{Message, Role};
use crate::tools::ToolDescriptor;

/// Token 使用统计（累计值）
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: Arc<AtomicU64>,
    pub completion_tokens: Arc<AtomicU64>,
    pub total_tokens: Arc<AtomicU64>,
}

impl TokenUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, prompt: u64, completion: u64) {
        self.prompt_tokens.fetch_add(prompt, Ordering::Relaxed);
        self.completion_tokens.fetch_add(completion, Ordering::Relaxed);
        self.total_tokens.fetch_add(prompt + completion, Ordering::Relaxed);
    }

    pub fn get(&self) -> (u64, u64, u64) {
        (
            self.prompt_tokens.load(Ordering::Relaxed),
            self.completion_tokens.load(Ordering::Relaxed),
            self.total_tokens.load(Ordering::Relaxed),
        )
    }
}

/// OpenAI 兼容客户端：持有 Client 与 model 名，chat 时转 Message 为 API 格式并取首个 choice
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    /// 生成参数：有界随机性与回复长度（对应配置 [llm].temperature / max_reply_tokens）
    temperature: f32,
    max_reply_tokens: u32,
    /// 累计 token 使用统计
    pub usage: TokenUsage,
}

impl OpenAiClient {
    pub fn new(
        base_url: Option<&str>,
        model: &str,
        api_key: Option<&str>,
        temperature: f32,
        max_reply_tokens: u32,
    ) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = if let Some(url) = base_url {
            OpenAIConfig::new().with_api_base(url).with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            temperature,
            max_reply_tokens,
            usage: TokenUsage::new(),
        }
    }

    fn to_openai_messages(&self, messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m.role {
                Role::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(m.content.clone().unwrap_or_default())
                        .build()
                        .unwrap(),
                ),
                Role::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(m.content.clone().unwrap_or_default())
                        .build()
                        .unwrap(),
                ),
                Role::Assistant => {
                    let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                    if let Some(content) = &m.content {
                        args.content(content.clone());
                    }
                    if let Some(calls) = &m.tool_calls {
                        args.tool_calls(
                            calls.iter().map(to_openai_tool_call).collect::<Vec<_>>(),
                        );
                    }
                    ChatCompletionRequestMessage::Assistant(args.build().unwrap())
                }
                Role::Tool => ChatCompletionRequestMessage::Tool(
                    ChatCompletionRequestToolMessageArgs::default()
                        .content(m.content.clone().unwrap_or_default())
                        .tool_call_id(m.tool_call_id.clone().unwrap_or_default())
                        .build()
                        .unwrap(),
                ),
            })
            .collect()
    }

    fn to_openai_tools(&self, tools: &[ToolDescriptor]) -> Vec<ChatCompletionTools> {
        tools
            .iter()
            .map(|t| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObjectArgs::default()
                        .name(t.name.clone())
                        .description(t.description.clone())
                        .parameters(t.parameters.clone())
                        .build()
                        .unwrap(),
                })
            })
            .collect()
    }
}

/// ToolCallRequest（我方消息模型）转 API 的 tool_call 对象，用于回放单轮会话内的调用历史
fn to_openai_tool_call(call: &ToolCallRequest) -> ChatCompletionMessageToolCalls {
    ChatCompletionMessageToolCalls::Function(ChatCompletionMessageToolCall {
        id: call.id.clone(),
        function: FunctionCall {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        },
    })
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn token_usage(&self) -> (u64, u64, u64) {
        self.usage.get()
    }

    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<ChatOutcome, String> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(self.to_openai_messages(messages))
            .temperature(self.temperature)
            .max_tokens(self.max_reply_tokens);
        if !tools.is_empty() {
            builder
                .tools(self.to_openai_tools(tools))
                .tool_choice(ChatCompletionToolChoiceOption::Mode(ToolChoiceOptions::Auto));
        }
        let request = builder.build().map_err(|e| e.to_string())?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| e.to_string())?;

        // 提取 token 使用统计
        if let Some(usage) = &response.usage {
            self.usage
                .add(usage.prompt_tokens as u64, usage.completion_tokens as u64);
        }

        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| "empty choices in chat completion response".to_string())?
            .message;

        if let Some(tool_calls) = message.tool_calls {
            // 只处理 function 类调用，其余变体（custom 等）忽略
            let calls: Vec<ToolCallRequest> = tool_calls
                .into_iter()
                .filter_map(|tc| match tc {
                    ChatCompletionMessageToolCalls::Function(f) => Some(ToolCallRequest {
                        id: f.id,
                        name: f.function.name,
                        arguments: f.function.arguments,
                    }),
                    _ => None,
                })
                .collect();
            if !calls.is_empty() {
                return Ok(ChatOutcome::ToolCalls(calls));
            }
        }

        Ok(ChatOutcome::Reply(message.content.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        OpenAiClient::new(None, "test-model", Some("sk-test"), 0.7, 300)
    }

    #[test]
    fn tool_catalog_serializes_as_function_entries() {
        let descriptors = vec![ToolDescriptor {
            name: "identify_material".to_string(),
            description: "Identify a material.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {"peak_1": {"type": "number"}},
                "required": ["peak_1"]
            }),
        }];
        let tools = client().to_openai_tools(&descriptors);
        let wire = serde_json::to_value(&tools).unwrap();
        assert_eq!(wire[0]["type"], "function");
        assert_eq!(wire[0]["function"]["name"], "identify_material");
        assert_eq!(wire[0]["function"]["parameters"]["required"][0], "peak_1");
    }

    #[test]
    fn tool_call_replay_keeps_id_name_arguments() {
        let call = ToolCallRequest {
            id: "call_1".to_string(),
            name: "identify_material".to_string(),
            arguments: r#"{"peak_1": 465}"#.to_string(),
        };
        let wire = serde_json::to_value(to_openai_tool_call(&call)).unwrap();
        assert_eq!(wire["id"], "call_1");
        assert_eq!(wire["type"], "function");
        assert_eq!(wire["function"]["name"], "identify_material");
        assert_eq!(wire["function"]["arguments"], r#"{"peak_1": 465}"#);
    }
}
