use std::collections::HashSet;

use bastion_config::{NodeKind, WorkflowDef};
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::node::Node;

/// A validated workflow graph.
///
/// Node order is preserved from the definition; analysis stages rely on it
/// (e.g. "the first trigger node").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkflowDef")]
pub struct Workflow {
  pub name: String,
  nodes: Vec<Node>,
  #[serde(skip)]
  ids: HashSet<String>,
}

impl Workflow {
  /// Validate a workflow definition.
  pub fn from_def(def: WorkflowDef) -> Result<Self, WorkflowError> {
    let mut workflow = Workflow {
      name: def.name,
      nodes: Vec::with_capacity(def.nodes.len()),
      ids: HashSet::with_capacity(def.nodes.len()),
    };

    for (index, node_def) in def.nodes.into_iter().enumerate() {
      let id = match node_def.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Err(WorkflowError::MissingNodeId { index }),
      };

      workflow.push(Node {
        id,
        kind: node_def.kind,
        title: node_def.title,
        description: node_def.description,
        position: node_def.position,
        config: node_def.config,
      })?;
    }

    Ok(workflow)
  }

  /// Build a workflow from already-constructed nodes.
  pub fn from_nodes(
    name: impl Into<String>,
    nodes: impl IntoIterator<Item = Node>,
  ) -> Result<Self, WorkflowError> {
    let mut workflow = Workflow {
      name: name.into(),
      nodes: Vec::new(),
      ids: HashSet::new(),
    };
    for node in nodes {
      workflow.push(node)?;
    }
    Ok(workflow)
  }

  /// Append a node, rejecting ids already present.
  pub fn push(&mut self, node: Node) -> Result<(), WorkflowError> {
    if node.id.trim().is_empty() {
      return Err(WorkflowError::MissingNodeId {
        index: self.nodes.len(),
      });
    }
    if !self.ids.insert(node.id.clone()) {
      return Err(WorkflowError::DuplicateNodeId { node_id: node.id });
    }
    self.nodes.push(node);
    Ok(())
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Get a node by ID.
  pub fn get_node(&self, node_id: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id == node_id)
  }

  pub fn first_of_kind(&self, kind: &NodeKind) -> Option<&Node> {
    self.nodes.iter().find(|n| &n.kind == kind)
  }

  /// The node drawn furthest down the canvas. The first one wins a tie.
  pub fn lowest_node(&self) -> Option<&Node> {
    self
      .nodes
      .iter()
      .reduce(|lowest, n| if n.position.y > lowest.position.y { n } else { lowest })
  }
}

impl TryFrom<WorkflowDef> for Workflow {
  type Error = WorkflowError;

  fn try_from(def: WorkflowDef) -> Result<Self, Self::Error> {
    Workflow::from_def(def)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bastion_config::{NodeConfig, NodeDef, Position};

  fn node_def(id: Option<&str>, kind: NodeKind) -> NodeDef {
    NodeDef {
      id: id.map(str::to_string),
      kind,
      title: String::new(),
      description: String::new(),
      position: Position::default(),
      config: NodeConfig::default(),
    }
  }

  #[test]
  fn test_from_def_preserves_order() {
    let def = WorkflowDef {
      name: "wf".to_string(),
      nodes: vec![
        node_def(Some("b"), NodeKind::Action),
        node_def(Some("a"), NodeKind::Trigger),
      ],
    };

    let workflow = Workflow::from_def(def).unwrap();
    let ids: Vec<_> = workflow.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(workflow.first_of_kind(&NodeKind::Trigger).unwrap().id, "a");
  }

  #[test]
  fn test_missing_id() {
    let def = WorkflowDef {
      name: "wf".to_string(),
      nodes: vec![
        node_def(Some("a"), NodeKind::Trigger),
        node_def(None, NodeKind::Action),
      ],
    };

    let err = Workflow::from_def(def).unwrap_err();
    assert!(matches!(err, WorkflowError::MissingNodeId { index: 1 }));
  }

  #[test]
  fn test_blank_id_is_missing() {
    let def = WorkflowDef {
      name: "wf".to_string(),
      nodes: vec![node_def(Some("  "), NodeKind::Trigger)],
    };

    let err = Workflow::from_def(def).unwrap_err();
    assert!(matches!(err, WorkflowError::MissingNodeId { index: 0 }));
  }

  #[test]
  fn test_duplicate_id() {
    let def = WorkflowDef {
      name: "wf".to_string(),
      nodes: vec![
        node_def(Some("a"), NodeKind::Trigger),
        node_def(Some("a"), NodeKind::Action),
      ],
    };

    let err = Workflow::from_def(def).unwrap_err();
    assert!(matches!(err, WorkflowError::DuplicateNodeId { node_id } if node_id == "a"));
  }

  #[test]
  fn test_deserialize_validates() {
    let result: Result<Workflow, _> = serde_json::from_str(
      r#"{ "name": "wf", "nodes": [{ "id": "a", "type": "trigger" }, { "id": "a", "type": "action" }] }"#,
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_serialize_round_trip() {
    let workflow = Workflow::from_json_for_test(
      r#"{ "name": "wf", "nodes": [
        { "id": "a", "type": "ai", "title": "Summarize", "config": { "model": "gpt-4" } }
      ] }"#,
    );
    let json = serde_json::to_string(&workflow).unwrap();
    let back: Workflow = serde_json::from_str(&json).unwrap();
    assert_eq!(back, workflow);
  }

  #[test]
  fn test_lowest_node() {
    let mut workflow = Workflow::from_nodes("wf", Vec::new()).unwrap();
    assert!(workflow.lowest_node().is_none());

    for (id, y) in [("a", 10.0), ("b", 300.0), ("c", 120.0), ("d", 300.0)] {
      let mut def = node_def(Some(id), NodeKind::Action);
      def.position = Position::new(0.0, y);
      workflow
        .push(Node {
          id: id.to_string(),
          kind: def.kind,
          title: def.title,
          description: def.description,
          position: def.position,
          config: def.config,
        })
        .unwrap();
    }
    assert_eq!(workflow.lowest_node().unwrap().id, "b");
  }

  impl Workflow {
    fn from_json_for_test(input: &str) -> Workflow {
      Workflow::from_def(WorkflowDef::from_json(input).unwrap()).unwrap()
    }
  }
}
