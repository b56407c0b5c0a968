//! 工具箱：工具 trait、注册表与 identify_material 适配器

pub mod identify;
pub mod registry;

pub use identify::IdentifyMaterialTool;
pub use registry::{Tool, ToolDescriptor, ToolRegistry, ToolResultEnvelope};
