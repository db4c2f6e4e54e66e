use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::node::NodeDef;

/// A workflow graph as supplied by the editor or a generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDef {
  #[serde(default = "default_name")]
  pub name: String,
  pub nodes: Vec<NodeDef>,
}

fn default_name() -> String {
  "untitled".to_string()
}

impl WorkflowDef {
  /// Parse a workflow from JSON.
  ///
  /// Accepts either `{ "name": ..., "nodes": [...] }` or a bare node array.
  pub fn from_json(input: &str) -> Result<Self, ConfigError> {
    let value: Value = serde_json::from_str(input)?;
    Self::from_value(value)
  }

  pub fn from_value(value: Value) -> Result<Self, ConfigError> {
    if value.is_array() {
      return Ok(Self {
        name: default_name(),
        nodes: serde_json::from_value(value)?,
      });
    }

    let Some(map) = value.as_object() else {
      return Err(ConfigError::NotANodeCollection(format!(
        "expected an object or array, got {}",
        json_type(&value)
      )));
    };

    match map.get("nodes") {
      Some(Value::Array(_)) => {}
      Some(other) => {
        return Err(ConfigError::NotANodeCollection(format!(
          "`nodes` must be an array, got {}",
          json_type(other)
        )));
      }
      None => {
        return Err(ConfigError::NotANodeCollection(
          "object has no `nodes` field".to_string(),
        ));
      }
    }

    Ok(serde_json::from_value(value)?)
  }
}

fn json_type(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::NodeKind;

  #[test]
  fn test_parse_object_form() {
    let def = WorkflowDef::from_json(
      r#"{
        "name": "Lead intake",
        "nodes": [
          { "id": "t1", "type": "trigger", "title": "New form submission" },
          { "id": "a1", "type": "action", "title": "Create CRM contact",
            "position": { "x": 100, "y": 200 } }
        ]
      }"#,
    )
    .unwrap();

    assert_eq!(def.name, "Lead intake");
    assert_eq!(def.nodes.len(), 2);
    assert_eq!(def.nodes[1].kind, NodeKind::Action);
    assert_eq!(def.nodes[1].position.y, 200.0);
  }

  #[test]
  fn test_parse_bare_array() {
    let def = WorkflowDef::from_json(r#"[{ "id": "t1", "type": "trigger" }]"#).unwrap();
    assert_eq!(def.name, "untitled");
    assert_eq!(def.nodes.len(), 1);
  }

  #[test]
  fn test_reject_non_collection() {
    let err = WorkflowDef::from_json(r#""just a string""#).unwrap_err();
    assert!(matches!(err, ConfigError::NotANodeCollection(_)));

    let err = WorkflowDef::from_json(r#"{ "nodes": 3 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NotANodeCollection(_)));

    let err = WorkflowDef::from_json(r#"{ "name": "x" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NotANodeCollection(_)));
  }

  #[test]
  fn test_reject_invalid_json() {
    let err = WorkflowDef::from_json("{ nodes: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
  }
}
