//! Tool definitions handed to a chat model for function calling.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::schema::SchemaBuilder;

/// Name, description and input schema of a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Tool name, unique within a toolkit.
    pub name: String,

    /// What the tool does, written for the model.
    pub description: String,

    /// JSON Schema of the arguments.
    pub parameters_json_schema: JsonValue,
}

impl ToolDefinition {
    /// Create a definition with an empty parameter schema.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_json_schema: SchemaBuilder::new().build(),
        }
    }

    /// Set the parameters schema.
    #[must_use]
    pub fn with_parameters(mut self, schema: impl Into<JsonValue>) -> Self {
        self.parameters_json_schema = schema.into();
        self
    }

    /// Get the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parameters schema.
    #[must_use]
    pub fn parameters(&self) -> &JsonValue {
        &self.parameters_json_schema
    }

    /// Convert to OpenAI function format.
    #[must_use]
    pub fn to_openai_function(&self) -> JsonValue {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_json_schema,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_empty_object_schema() {
        let def = ToolDefinition::new("ads4gpts_chat", "Chat ads");
        assert_eq!(def.name(), "ads4gpts_chat");
        assert_eq!(def.parameters()["type"], "object");
    }

    #[test]
    fn test_openai_function_format() {
        let def = ToolDefinition::new("t", "Test tool")
            .with_parameters(SchemaBuilder::new().string("x", "A value", true).build());

        let func = def.to_openai_function();
        assert_eq!(func["type"], "function");
        assert_eq!(func["function"]["name"], "t");
        assert_eq!(func["function"]["parameters"]["required"][0], "x");
    }
}
