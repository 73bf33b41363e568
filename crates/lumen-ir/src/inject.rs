// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use crate::schema::Graph;

/// Where a parameter assignment landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Injection {
    /// A node parameter was written, either through a qualified reference or
    /// a first-match bare one.
    Node { id: String },
    /// No node qualified; the value was recorded under graph metadata so the
    /// intent survives even though the simulator may not consume it there.
    Metadata,
    /// A qualified reference named a node that does not exist. Nothing was
    /// mutated. Downstream optimization flows rely on this being tolerated
    /// rather than raised.
    Skipped,
}

impl Graph {
    /// Applies one named parameter value, resolving the name in three tiers:
    ///
    /// 1. `node_id:param` (split on the first `:`) writes `params[param]` on
    ///    the node with that identifier, creating the mapping if absent; an
    ///    unknown node id is a silent no-op.
    /// 2. A bare name overwrites the first node, in stored order, whose
    ///    existing params mapping already contains it.
    /// 3. Otherwise the value is recorded as `metadata[name]`, stringified.
    ///
    /// The tiers decide which parameters are live in the simulation versus
    /// merely recorded, so their order is part of the contract. Nodes are
    /// never added, removed, or reordered.
    pub fn apply_parameter(&mut self, name: &str, value: f64) -> Injection {
        if let Some((node_id, key)) = name.split_once(':') {
            return match self.node_mut(node_id) {
                Some(node) => {
                    node.params.insert(key.to_string(), value);
                    Injection::Node {
                        id: node_id.to_string(),
                    }
                }
                None => Injection::Skipped,
            };
        }

        for node in &mut self.nodes {
            if node.params.contains_key(name) {
                node.params.insert(name.to_string(), value);
                return Injection::Node {
                    id: node.id.clone(),
                };
            }
        }

        self.metadata.insert(name.to_string(), value.to_string());
        Injection::Metadata
    }

    /// Applies an ordered sequence of `(name, value)` assignments, returning
    /// one [`Injection`] outcome per pair in the same order.
    pub fn apply_parameters<'a, I>(&mut self, assignments: I) -> Vec<Injection>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        assignments
            .into_iter()
            .map(|(name, value)| self.apply_parameter(name, value))
            .collect()
    }
}
