// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{IrError, Result};

/// One element of the IR graph, identified by a unique id and owning an
/// optional parameter mapping.
///
/// Keys the bridge does not interpret (measurement modes, conditional
/// branches, vendor extensions) are collected into `extra` and written back
/// verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Directed connection between two node ports.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub src_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<String>,
    pub dst_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
}

/// Declarative circuit description consumed by the external simulator.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Graph {
    /// Parses a graph from its JSON serialisation.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a graph from a JSON document on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| IrError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Serialises the graph as pretty-printed JSON, the layout the external
    /// tooling writes and expects.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the graph to a JSON document on disk.
    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_json()?;
        fs::write(path, text).map_err(|source| IrError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Looks up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Looks up a node by identifier for mutation.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    /// Checks structural invariants: node identifiers are unique and every
    /// edge endpoint names an existing node.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(IrError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }
        for edge in &self.edges {
            for id in [&edge.src_node, &edge.dst_node] {
                if !seen.contains(id.as_str()) {
                    return Err(IrError::DanglingEdge { id: id.clone() });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"{
        "nodes": [
            {
                "id": "mzi_0",
                "type": "MZI",
                "params": { "phase": 0.1, "loss": 0.01 },
                "measure_mode": "mode_0"
            },
            { "id": "det_0", "type": "DETECTOR" }
        ],
        "edges": [
            { "src_node": "mzi_0", "dst_node": "det_0", "delay": 0.5 }
        ],
        "metadata": { "input_amplitude": "1.0" },
        "schema_version": "0.1"
    }"#;

    #[test]
    fn parses_the_interpreted_subset() {
        let graph = Graph::from_json(TEMPLATE).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.node("mzi_0").unwrap().params["phase"], 0.1);
        assert_eq!(graph.metadata["input_amplitude"], "1.0");
        assert_eq!(graph.edges[0].delay, Some(0.5));
    }

    #[test]
    fn uninterpreted_structure_survives_a_round_trip() {
        let graph = Graph::from_json(TEMPLATE).unwrap();
        let text = graph.to_json().unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed["schema_version"], "0.1");
        assert_eq!(reparsed["nodes"][0]["measure_mode"], "mode_0");

        // A second pass through the typed model changes nothing.
        assert_eq!(Graph::from_json(&text).unwrap(), graph);
    }

    #[test]
    fn validate_rejects_duplicate_node_ids() {
        let mut graph = Graph::from_json(TEMPLATE).unwrap();
        let clone = graph.nodes[0].clone();
        graph.nodes.push(clone);
        assert!(matches!(
            graph.validate(),
            Err(IrError::DuplicateNode { id }) if id == "mzi_0"
        ));
    }

    #[test]
    fn validate_rejects_dangling_edges() {
        let mut graph = Graph::from_json(TEMPLATE).unwrap();
        graph.edges[0].dst_node = "ghost".to_string();
        assert!(matches!(
            graph.validate(),
            Err(IrError::DanglingEdge { id }) if id == "ghost"
        ));
        graph.edges[0].dst_node = "det_0".to_string();
        graph.validate().unwrap();
    }

    #[test]
    fn malformed_documents_surface_a_parse_error() {
        assert!(matches!(
            Graph::from_json("{ not json"),
            Err(IrError::Parse(_))
        ));
    }
}
