// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::path::PathBuf;

use crate::bridge::{BackwardContext, GradientBridge};
use crate::Result;
use lumen_sim::Simulator;

/// Trainable scalar bound to one IR parameter reference.
///
/// The name doubles as the injection key: `node_id:param` pins one node, a
/// bare key resolves by first match across the graph.
#[derive(Clone, Debug)]
pub struct Parameter {
    name: String,
    value: f64,
    gradient: Option<f64>,
}

impl Parameter {
    /// Creates a parameter with the provided starting value.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            gradient: None,
        }
    }

    /// Injection key this parameter binds to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current scalar value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Overwrites the scalar value; typically an optimizer step.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Accumulated gradient, once a backward pass has produced one.
    pub fn gradient(&self) -> Option<f64> {
        self.gradient
    }

    /// Adds `grad` into the accumulated gradient.
    pub fn accumulate(&mut self, grad: f64) {
        *self.gradient.get_or_insert(0.0) += grad;
    }

    /// Clears the accumulated gradient.
    pub fn zero_grad(&mut self) {
        self.gradient = None;
    }
}

/// A differentiable objective over a fixed IR template.
///
/// `evaluate` runs the circuit at the parameters' current values; `backprop`
/// chains the upstream gradient through the external estimator and
/// accumulates the result into the parameters, index-for-index.
pub struct CircuitFunction<S> {
    bridge: GradientBridge<S>,
    template: PathBuf,
    seed: Option<u64>,
}

impl<S: Simulator> CircuitFunction<S> {
    /// Binds a simulator to an IR template. The replay seed defaults to the
    /// global determinism configuration.
    pub fn new(simulator: S, template: impl Into<PathBuf>) -> Self {
        let seed = lumen_config::determinism::config().simulator_seed("circuit");
        Self {
            bridge: GradientBridge::new(simulator),
            template: template.into(),
            seed,
        }
    }

    /// Pins the replay seed for both passes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn bridge(&self) -> &GradientBridge<S> {
        &self.bridge
    }

    /// Evaluates the objective at the parameters' current values.
    pub fn evaluate(&self, params: &[Parameter]) -> Result<(f64, BackwardContext)> {
        let names: Vec<String> = params.iter().map(|p| p.name().to_string()).collect();
        let values: Vec<f64> = params.iter().map(Parameter::value).collect();
        self.bridge.forward(&self.template, &names, &values, self.seed)
    }

    /// Chains `upstream` through the external estimator and accumulates the
    /// scaled gradients into `params`, aligned with `evaluate`'s order.
    pub fn backprop(
        &self,
        context: &BackwardContext,
        upstream: f64,
        params: &mut [Parameter],
    ) -> Result<()> {
        let grads = self.bridge.backward(context, upstream)?;
        for (param, grad) in params.iter_mut().zip(grads) {
            param.accumulate(grad);
        }
        Ok(())
    }
}
