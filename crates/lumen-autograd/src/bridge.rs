// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use lumen_ir::{Graph, Injection};
use lumen_sim::{GradientRequest, SimulationResult, Simulator};

use crate::objective::extract_objective;
use crate::{BridgeError, Result};

/// State carried from one forward evaluation to its backward pass: the
/// staged IR the simulator executed, the parameter order gradients are
/// reported in, and the replay seed.
///
/// Owned by the forward call's result; one context feeds one backward call.
/// Running backward again re-invokes the external estimator from scratch, so
/// treat contexts as single-use. The staging directory stays on disk because
/// backward reads it after forward returns; cleaning it up is the caller's
/// responsibility.
#[derive(Clone, Debug)]
pub struct BackwardContext {
    ir_path: PathBuf,
    param_names: Vec<String>,
    seed: Option<u64>,
}

impl BackwardContext {
    /// Path of the staged IR the forward pass executed.
    pub fn ir_path(&self) -> &Path {
        &self.ir_path
    }

    /// Parameter names, in the order gradients are reported.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Seed forwarded to the estimator for deterministic replay.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Custom forward/backward pair exposing one external simulation as a
/// differentiable scalar function of its named parameters.
#[derive(Clone, Debug)]
pub struct GradientBridge<S> {
    simulator: S,
}

impl<S: Simulator> GradientBridge<S> {
    pub fn new(simulator: S) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Forward evaluation: inject `param_values` into the template, execute
    /// it, and reduce the results document to one scalar.
    ///
    /// Returns the scalar paired with the context the backward pass needs.
    /// Any failure surfaces before a context exists; there is no partial
    /// success state.
    pub fn forward(
        &self,
        template: &Path,
        param_names: &[String],
        param_values: &[f64],
        seed: Option<u64>,
    ) -> Result<(f64, BackwardContext)> {
        if param_names.len() != param_values.len() {
            return Err(BridgeError::LengthMismatch {
                expected: param_names.len(),
                got: param_values.len(),
            });
        }

        let mut graph = Graph::from_path(template)?;
        for (name, value) in param_names.iter().zip(param_values) {
            match graph.apply_parameter(name, *value) {
                Injection::Node { .. } => {}
                Injection::Metadata => {
                    debug!(param = %name, "no node parameter matched; recorded under metadata");
                }
                Injection::Skipped => {
                    debug!(param = %name, "qualified reference matched no node; skipped");
                }
            }
        }

        let staging = tempfile::Builder::new()
            .prefix("lumen_autograd_")
            .tempdir()
            .map_err(BridgeError::Stage)?
            .into_path();
        let ir_path = staging.join("ir.json");
        graph.to_path(&ir_path)?;

        let artifacts = self.simulator.run(&ir_path, seed)?;
        let results_path = artifacts
            .results
            .clone()
            .ok_or(BridgeError::MissingResults {
                dir: artifacts.dir.clone(),
            })?;
        let text = fs::read_to_string(&results_path).map_err(|err| BridgeError::MalformedResults {
            path: results_path.clone(),
            message: err.to_string(),
        })?;
        let results: SimulationResult =
            serde_json::from_str(&text).map_err(|err| BridgeError::MalformedResults {
                path: results_path,
                message: err.to_string(),
            })?;

        let cost = extract_objective(&results);
        debug!(
            cost,
            records = results.node_results.len(),
            ir = %ir_path.display(),
            "forward evaluation complete"
        );

        Ok((
            cost,
            BackwardContext {
                ir_path,
                param_names: param_names.to_vec(),
                seed,
            },
        ))
    }

    /// Backward evaluation: finite-difference gradients for the context's
    /// parameters, chained with the upstream gradient of the scalar output.
    ///
    /// The returned vector aligns index-for-index with the context's
    /// parameter order; names the estimator omitted contribute zero.
    pub fn backward(&self, context: &BackwardContext, upstream: f64) -> Result<Vec<f64>> {
        let report = self.simulator.estimate_gradient(
            context.ir_path(),
            context.param_names(),
            &GradientRequest::finite_difference(context.seed()),
        )?;
        Ok(context
            .param_names()
            .iter()
            .map(|name| report.gradient(name) * upstream)
            .collect())
    }
}
