// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Reverse-mode bridge over the external simulator.
//!
//! Forward: inject parameter values into an IR template, execute it through
//! a [`lumen_sim::Simulator`], and reduce the results document to one scalar
//! objective. Backward: hand the staged IR to the external finite-difference
//! estimator and chain the reported gradients with the upstream gradient of
//! the scalar output. The two passes are connected by an explicit
//! [`BackwardContext`] value rather than state hidden on the scalar.

use std::path::PathBuf;

use thiserror::Error;

mod bridge;
mod module;
mod objective;

pub use bridge::{BackwardContext, GradientBridge};
pub use module::{CircuitFunction, Parameter};
pub use objective::extract_objective;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors emitted by the forward/backward bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Parameter names and values must pair off exactly; checked before any
    /// subprocess is spawned.
    #[error("expected {expected} parameter values, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// The run completed but its bundle carried no results document.
    #[error("run produced no results document in {dir}")]
    MissingResults { dir: PathBuf },
    /// The results document existed but could not be read or parsed.
    #[error("failed to parse results document {path}: {message}")]
    MalformedResults { path: PathBuf, message: String },
    /// The per-call IR staging directory could not be created.
    #[error("failed to create IR staging directory: {0}")]
    Stage(std::io::Error),
    #[error(transparent)]
    Ir(#[from] lumen_ir::IrError),
    #[error(transparent)]
    Sim(#[from] lumen_sim::SimError),
}
