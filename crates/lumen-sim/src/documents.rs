// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Analog or digital readout attached to a detector node.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub detector_id: String,
    /// Discrete outcome index; absent for purely analog detectors.
    #[serde(default)]
    pub outcome: Option<u64>,
    #[serde(default)]
    pub analog_value: Option<f64>,
}

/// Per-node record in the simulator's results document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeResult {
    pub node_id: String,
    /// Complex output amplitude as a `(re, im)` pair, when the node emits one.
    #[serde(default)]
    pub out_amplitude: Option<(f64, f64)>,
    #[serde(default)]
    pub phase_noise: f64,
    #[serde(default)]
    pub power_loss: f64,
    #[serde(default)]
    pub measurement: Option<Measurement>,
}

/// Ordered per-node results emitted by one simulator run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub run_seed: Option<u64>,
    #[serde(default)]
    pub node_results: Vec<NodeResult>,
}

/// Parsed gradient estimation document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GradientReport {
    /// Parameter-reference string to estimated gradient.
    pub gradients: BTreeMap<String, f64>,
    /// Per-parameter spread reported by stochastic estimators.
    #[serde(default)]
    pub gradient_std: Option<BTreeMap<String, f64>>,
    /// Free-form provenance recorded by the estimator.
    #[serde(default)]
    pub provenance: BTreeMap<String, String>,
}

impl GradientReport {
    /// Gradient estimate for `name`. A name the estimator omitted means a
    /// gradient of zero, never an error.
    pub fn gradient(&self, name: &str) -> f64 {
        self.gradients.get(name).copied().unwrap_or(0.0)
    }
}
