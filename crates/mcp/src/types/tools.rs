//! Operation descriptors advertised through `tools/list`.
//!
//! A descriptor merges what the backend reports (name and description) with
//! the locally known parameter schema, and renders into the `rmcp` tool model
//! so the JSON shape matches what MCP clients expect.

use rmcp::model::Tool;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// JSON type of a single tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Array,
}

impl ParameterType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
        }
    }
}

/// One named, typed parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParameterType,
    pub description: &'static str,
    pub required: bool,
}

impl ParameterSpec {
    pub const fn required(name: &'static str, kind: ParameterType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParameterType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
        }
    }
}

/// An operation as advertised to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Operation name reported by the backend.
    pub name: String,
    /// Human-readable description reported by the backend.
    pub description: String,
    /// Known parameter schema; empty for operations with no entry.
    pub parameters: &'static [ParameterSpec],
}

impl OperationDescriptor {
    /// JSON schema object describing the operation's arguments.
    pub fn input_schema(&self) -> Map<String, Value> {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|parameter| {
                (
                    parameter.name.to_string(),
                    json!({ "type": parameter.kind.as_str(), "description": parameter.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|parameter| parameter.required)
            .map(|parameter| parameter.name)
            .collect();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), json!(required));
        schema
    }

    /// Render into the MCP tool model.
    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name.clone(), self.description.clone(), Arc::new(self.input_schema()))
    }
}

/// Result of `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolListing {
    pub tools: Vec<Tool>,
}

impl ToolListing {
    pub fn from_descriptors(descriptors: &[OperationDescriptor]) -> Self {
        Self {
            tools: descriptors.iter().map(OperationDescriptor::to_tool).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_LOOKUP: [ParameterSpec; 2] = [
        ParameterSpec::required("userId", ParameterType::Number, "User id"),
        ParameterSpec::optional("verbose", ParameterType::Boolean, "Include audit fields"),
    ];

    #[test]
    fn schema_lists_only_required_parameters_as_required() {
        let descriptor = OperationDescriptor {
            name: "find_user_by_id".into(),
            description: "Finds a user".into(),
            parameters: &USER_LOOKUP,
        };
        let schema = Value::Object(descriptor.input_schema());
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["userId"], json!({"type": "number", "description": "User id"}));
        assert_eq!(schema["properties"]["verbose"]["type"], "boolean");
        assert_eq!(schema["required"], json!(["userId"]));
    }

    #[test]
    fn properties_keep_table_order() {
        const NEW_USER: [ParameterSpec; 4] = [
            ParameterSpec::required("name", ParameterType::String, "Full name"),
            ParameterSpec::required("email", ParameterType::String, "Email address"),
            ParameterSpec::required("department", ParameterType::String, "Department"),
            ParameterSpec::required("role", ParameterType::String, "Role"),
        ];
        let descriptor = OperationDescriptor {
            name: "create_user".into(),
            description: "Creates a user".into(),
            parameters: &NEW_USER,
        };
        let schema = descriptor.input_schema();
        let properties: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
        assert_eq!(properties, ["name", "email", "department", "role"]);

        let rendered = serde_json::to_string(&descriptor.to_tool()).unwrap();
        let name_at = rendered.find("\"name\":{").unwrap();
        let role_at = rendered.find("\"role\":{").unwrap();
        assert!(name_at < role_at);
    }

    #[test]
    fn empty_schema_still_describes_an_object() {
        let descriptor = OperationDescriptor {
            name: "mystery".into(),
            description: String::new(),
            parameters: &[],
        };
        let schema = Value::Object(descriptor.input_schema());
        assert_eq!(schema, json!({"type": "object", "properties": {}, "required": []}));
    }

    #[test]
    fn tool_serializes_with_input_schema() {
        let descriptor = OperationDescriptor {
            name: "delete_user".into(),
            description: "Deletes a user".into(),
            parameters: &USER_LOOKUP,
        };
        let value = serde_json::to_value(ToolListing::from_descriptors(&[descriptor])).unwrap();
        let tool = &value["tools"][0];
        assert_eq!(tool["name"], "delete_user");
        assert_eq!(tool["description"], "Deletes a user");
        assert_eq!(tool["inputSchema"]["required"], json!(["userId"]));
    }
}
