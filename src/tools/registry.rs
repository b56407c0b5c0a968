//! 工具注册表
//!
//! 所有工具实现 Tool trait（name / description / parameters_schema / execute），
//! 由 ToolRegistry 按名注册与查找；execute 统一返回 ToolResultEnvelope，
//! 未知工具、参数错误、领域失败一律封装为失败信封，绝不向调用方抛错。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 工具 trait：名称、描述（供 LLM 理解）、参数 schema、异步执行（args 为已解析的 JSON）
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（工具调用请求中的 name 字段）
    fn name(&self) -> &str;

    /// 工具描述（供 LLM 理解功能）
    fn description(&self) -> &str;

    /// 参数 JSON Schema（供 LLM 生成正确的参数格式）
    /// 默认返回空对象，表示无参数或参数格式不限
    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    /// 执行工具：Ok 为结果值，Err 为失败原因文本（由注册表封装为信封）
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// 工具目录条目：向模型公开的 name / description / 参数 schema
#[derive(Clone, Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// 工具执行结果信封：success 标志 + 结果值或错误文本，始终可序列化为单个文本载荷
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResultEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResultEnvelope {
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// 序列化为 tool 消息的文本载荷
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"success":false,"error":"envelope serialization failed"}"#.to_string())
    }
}

/// 工具注册表：按名称存储 Arc<dyn Tool>，支持 register / get / execute / descriptors
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// 执行工具并封装结果：未知工具与执行失败均为失败信封，不抛错
    pub async fn execute(&self, name: &str, args: Value) -> ToolResultEnvelope {
        let Some(tool) = self.tools.get(name) else {
            return ToolResultEnvelope::failure(format!("Unknown tool: {name}"));
        };
        match tool.execute(args).await {
            Ok(result) => ToolResultEnvelope::success(result),
            Err(e) => ToolResultEnvelope::failure(e),
        }
    }

    /// 生成向模型公开的工具目录（与实际注册的工具一致）
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase text. Args: {\"text\": \"message\"}"
        }

        async fn execute(&self, args: Value) -> Result<Value, String> {
            let text = args
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| "missing field `text`".to_string())?;
            Ok(Value::String(text.to_uppercase()))
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_failed_envelope() {
        let registry = ToolRegistry::new();
        let envelope = registry.execute("nope", serde_json::json!({})).await;
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn tool_error_is_failed_envelope() {
        let mut registry = ToolRegistry::new();
        registry.register(UpperTool);
        let envelope = registry.execute("upper", serde_json::json!({})).await;
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("text"));
    }

    #[tokio::test]
    async fn success_envelope_payload_shape() {
        let mut registry = ToolRegistry::new();
        registry.register(UpperTool);
        let envelope = registry
            .execute("upper", serde_json::json!({"text": "ceria"}))
            .await;
        assert!(envelope.success);
        let payload: Value = serde_json::from_str(&envelope.to_payload()).unwrap();
        assert_eq!(payload["success"], Value::Bool(true));
        assert_eq!(payload["result"], Value::String("CERIA".to_string()));
    }

    #[test]
    fn descriptors_match_registered_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(UpperTool);
        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "upper");
        assert_eq!(descriptors[0].parameters["type"], "object");
    }
}
