//! identify_material 工具
//!
//! 桥接模型的非类型化调用参数与领域函数的类型化契约：
//! 先 decode 为强类型参数记录（缺字段 / 形状错误即失败），再调用领域函数。
//! schema 中的物理范围仅写给模型参考，不在此层强制（范围校验在领域函数内）。

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::materials::MaterialIndex;
use crate::tools::Tool;

/// identify_material 的类型化参数记录
#[derive(Debug, Deserialize)]
struct IdentifyArgs {
    peak_1: f64,
    peak_2: f64,
    formation_energy: f64,
}

/// 材料识别工具：系统当前唯一注册的工具
#[derive(Default)]
pub struct IdentifyMaterialTool {
    index: MaterialIndex,
}

impl IdentifyMaterialTool {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Tool for IdentifyMaterialTool {
    fn name(&self) -> &str {
        "identify_material"
    }

    fn description(&self) -> &str {
        "Identify a material based on its Raman spectroscopy peaks and formation energy. \
         Returns the predicted material name with confidence score."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "peak_1": {
                    "type": "number",
                    "description": "First Raman peak in wavenumbers (cm^-1). Typically between 100-2000 cm^-1."
                },
                "peak_2": {
                    "type": "number",
                    "description": "Second Raman peak in wavenumbers (cm^-1). Typically between 100-2000 cm^-1."
                },
                "formation_energy": {
                    "type": "number",
                    "description": "Formation energy in eV per atom. Typically between -15 and 0 eV/atom. Negative values indicate stable compounds."
                }
            },
            "required": ["peak_1", "peak_2", "formation_energy"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: IdentifyArgs = serde_json::from_value(args).map_err(|e| e.to_string())?;
        let identification = self
            .index
            .identify(args.peak_1, args.peak_2, args.formation_energy)
            .map_err(|e| e.to_string())?;
        serde_json::to_value(&identification).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn golden_ceria_case() {
        let tool = IdentifyMaterialTool::new();
        let result = tool
            .execute(serde_json::json!({
                "peak_1": 465,
                "peak_2": 610,
                "formation_energy": -11.2
            }))
            .await
            .unwrap();
        assert_eq!(result["material"], "Ceria");
        assert_eq!(result["formula"], "CeO2");
    }

    #[tokio::test]
    async fn missing_formation_energy_fails() {
        let tool = IdentifyMaterialTool::new();
        let err = tool
            .execute(serde_json::json!({"peak_1": 465, "peak_2": 610}))
            .await
            .unwrap_err();
        assert!(err.contains("formation_energy"));
    }

    #[tokio::test]
    async fn wrong_shape_fails() {
        let tool = IdentifyMaterialTool::new();
        let err = tool
            .execute(serde_json::json!({
                "peak_1": "four sixty five",
                "peak_2": 610,
                "formation_energy": -11.2
            }))
            .await
            .unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn schema_declares_three_required_numbers() {
        let tool = IdentifyMaterialTool::new();
        let schema = tool.parameters_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        for field in ["peak_1", "peak_2", "formation_energy"] {
            assert_eq!(schema["properties"][field]["type"], "number");
        }
    }
}
