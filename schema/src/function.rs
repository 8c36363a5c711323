//! Wraps assembled parameters into the canonical function tool definition
//!
//! The output shape is `{type: "function", function: {name, description?, parameters}}`.

use error_stack::Report;
use serde::Serialize;
use serde_json::Value;

use crate::assembler::{ToolDefinitionAssembler, ToolParameterSet, ToolParameters};
use crate::constants::{FIELD_DESCRIPTION, FIELD_NAME, FIELD_PARAMETERS};
use crate::error::{Error, Result};
use crate::json_field_access::JsonFieldAccess;

/// Replace characters that are not valid in function names
#[must_use]
pub fn sanitize_function_name(name: &str) -> String {
    name.replace([' ', '.'], "_")
}

/// Tool kind tag; only functions exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// A callable function
    #[default]
    Function,
}

/// The `function` body of a tool definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    name:        String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<Value>,
    parameters:  Value,
}

impl FunctionDefinition {
    /// Build a function body, sanitizing `name`
    #[must_use]
    pub fn new(name: &str, description: Option<Value>, parameters: &ToolParameters) -> Self {
        Self {
            name: sanitize_function_name(name),
            description,
            parameters: parameters.to_schema(),
        }
    }

    /// Sanitized function name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Function description, if any
    #[must_use]
    pub const fn description(&self) -> Option<&Value> {
        self.description.as_ref()
    }

    /// The `{type: "object", properties, required}` parameters schema
    #[must_use]
    pub const fn parameters(&self) -> &Value {
        &self.parameters
    }
}

/// A complete tool definition as consumed by chat-completion APIs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    kind:     ToolKind,
    function: FunctionDefinition,
}

impl ToolDefinition {
    /// Wrap a function body
    #[must_use]
    pub const fn new(function: FunctionDefinition) -> Self {
        Self {
            kind: ToolKind::Function,
            function,
        }
    }

    /// The wrapped function body
    #[must_use]
    pub const fn function(&self) -> &FunctionDefinition {
        &self.function
    }
}

impl ToolDefinitionAssembler {
    /// Convert a `{name, description?, parameters?}` tool declaration into a
    /// [`ToolDefinition`]
    ///
    /// A missing `parameters` field is treated as an empty parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterSet`] if the declaration is not an object,
    /// lacks a string `name`, or carries a malformed parameter mapping.
    pub fn convert_tool(&self, tool: &Value) -> Result<ToolDefinition> {
        let name = tool.get_field_str(FIELD_NAME).ok_or_else(|| {
            Report::new(Error::invalid("tool", "missing string 'name'"))
                .attach(format!("Received: {tool}"))
        })?;

        let parameters = match tool.get_field(FIELD_PARAMETERS) {
            Some(parameters) => ToolParameterSet::from_json(parameters)
                .map_err(|report| report.attach(format!("Tool: {name}")))?,
            None => ToolParameterSet::new(),
        };

        let function = FunctionDefinition::new(
            name,
            tool.get_field(FIELD_DESCRIPTION).cloned(),
            &self.assemble(&parameters),
        );
        Ok(ToolDefinition::new(function))
    }
}

/// Convert a tool declaration with default assembler options
///
/// # Errors
///
/// See [`ToolDefinitionAssembler::convert_tool`].
pub fn convert_tool(tool: &Value) -> Result<ToolDefinition> {
    ToolDefinitionAssembler::default().convert_tool(tool)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sanitize_function_name() {
        assert_eq!(sanitize_function_name("Market Trends.v2"), "Market_Trends_v2");
        assert_eq!(sanitize_function_name("get_weather"), "get_weather");
    }

    #[test]
    fn test_convert_tool() {
        let tool = json!({
            "name": "search api",
            "description": "Search the catalog",
            "parameters": {
                "query": {"type": "str", "description": "terms"},
                "limit": {"type": "int, optional", "default": "10"},
                "tags": {"type": "List[str], optional", "default": "a,b"},
            },
        });

        let definition = convert_tool(&tool).unwrap();
        assert_eq!(definition.function().name(), "search_api");
        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({
                "type": "function",
                "function": {
                    "name": "search_api",
                    "description": "Search the catalog",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "query": {"type": "string", "description": "terms"},
                            "limit": {"type": "integer", "default": 10},
                            "tags": {"type": "array", "items": {"type": "string"}},
                        },
                        "required": ["query"],
                    },
                },
            })
        );
    }

    #[test]
    fn test_convert_tool_without_parameters() {
        let definition = convert_tool(&json!({"name": "ping"})).unwrap();
        assert_eq!(definition.function().description(), None);
        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({
                "type": "function",
                "function": {
                    "name": "ping",
                    "parameters": {"type": "object", "properties": {}, "required": []},
                },
            })
        );
    }

    #[test]
    fn test_convert_tool_rejects_malformed_declarations() {
        for tool in [
            json!("ping"),
            json!({"description": "no name"}),
            json!({"name": "p", "parameters": ["a"]}),
            json!({"name": "p", "parameters": {"a": {"type": ["int"]}}}),
        ] {
            let report = convert_tool(&tool).unwrap_err();
            assert!(matches!(
                report.current_context(),
                Error::InvalidParameterSet(_)
            ));
        }
    }
}
