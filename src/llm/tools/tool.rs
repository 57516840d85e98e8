use crate::error::{ClinicError, Result};
use crate::llm::models::LlmToolCall;
use serde_json::Value;
use std::collections::HashMap;

/// Descriptor for tool function parameters
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDescriptor {
    pub r#type: String,
    pub function: FunctionDescriptor,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Build a `function` descriptor.
    pub fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            r#type: "function".to_string(),
            function: FunctionDescriptor {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// Trait for LLM tools
pub trait LlmTool: Send + Sync {
    /// Execute the tool with given arguments
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value>;

    /// Get tool descriptor for LLM
    fn descriptor(&self) -> ToolDescriptor;

    /// Check if this tool matches the given name
    fn matches(&self, name: &str) -> bool {
        self.descriptor().function.name == name
    }

    /// Execute the tool for a call emitted by the model
    fn call(&self, tool_call: &LlmToolCall) -> Result<Value> {
        self.run(&tool_call.arguments)
    }
}

/// Fetch a required string argument or fail with a [`ClinicError::ToolError`].
pub fn required_str<'a>(args: &'a HashMap<String, Value>, key: &str) -> Result<&'a str> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ClinicError::ToolError(format!(
            "Argument '{}' must be a string, got {}",
            key, other
        ))),
        None => Err(ClinicError::ToolError(format!("Missing required argument: {}", key))),
    }
}
