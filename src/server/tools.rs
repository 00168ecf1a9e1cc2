use serde::Serialize;
use serde_json::{json, Value};

pub const CREATE_CHECKLIST: &str = "create_checklist";

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// The single tool this server exposes.
pub fn checklist_tool() -> ToolDefinition {
    ToolDefinition {
        name: CREATE_CHECKLIST,
        description: "Create a detailed markdown checklist with checkboxes for the specified task or topic. \
                      The checklist is saved to a file; do not regenerate or reformat it.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The topic or task to create a checklist for (e.g., \"building a web app\")"
                },
                "num_items": {
                    "type": "integer",
                    "description": "Number of items to include in the checklist (default: 5)"
                },
                "random_string": {
                    "type": "string",
                    "description": "Alternative parameter for topic, used by some clients like Cursor"
                }
            }
        }),
    }
}

/// All tool definitions for the `tools/list` response.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![checklist_tool()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_shape() {
        let json = serde_json::to_value(checklist_tool()).unwrap();
        assert_eq!(json["name"], "create_checklist");
        let props = &json["inputSchema"]["properties"];
        assert_eq!(props["topic"]["type"], "string");
        assert_eq!(props["num_items"]["type"], "integer");
        assert_eq!(props["random_string"]["type"], "string");
    }

    #[test]
    fn test_exactly_one_tool() {
        assert_eq!(tool_definitions().len(), 1);
    }
}
