// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Driver for the external photonic simulator process.
//!
//! The simulator is a black box behind the [`Simulator`] trait: `run`
//! executes an IR and yields an artifact bundle, `estimate_gradient` runs a
//! numeric estimation pass and yields a parsed gradient report. The
//! production implementation shells out to `lumenctl` and locates bundles by
//! scanning for the most recently written artifact directory; tests swap in
//! an in-process fake.
//!
//! Every call is synchronous and blocking, with no timeout: a hung simulator
//! hangs the caller. Failures are never retried here.

use std::path::PathBuf;

use thiserror::Error;

mod artifacts;
mod client;
mod documents;
mod process;

pub use artifacts::{latest_artifact_dir, resolve_files, RunArtifacts, GRAD_PREFIX, RUN_PREFIX};
pub use client::{CtlSimulator, GradientRequest, Simulator};
pub use documents::{GradientReport, Measurement, NodeResult, SimulationResult};

pub type Result<T> = std::result::Result<T, SimError>;

/// Errors emitted while driving the simulator or resolving its artifacts.
#[derive(Debug, Error)]
pub enum SimError {
    /// The executable could not be started at all.
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    /// The process ran but reported failure; its artifacts may be partial or
    /// absent and must not be inspected.
    #[error("`{command}` exited with code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },
    /// No artifact directory matched the expected prefix after a
    /// presumed-successful exit.
    #[error("no {kind} artifact directory found matching `{prefix}*` under {dir}")]
    ArtifactNotFound {
        kind: &'static str,
        prefix: String,
        dir: PathBuf,
    },
    /// A required document was absent from an otherwise resolved bundle.
    #[error("{name} missing from artifact directory {dir}")]
    MissingDocument { name: &'static str, dir: PathBuf },
    /// A document was present but could not be read or parsed.
    #[error("failed to parse {path}: {message}")]
    Malformed { path: PathBuf, message: String },
    /// Stochastic estimators need at least one sample.
    #[error("gradient estimation requires a positive sample count")]
    InvalidSamples,
    /// Filesystem access around artifact bundles failed.
    #[error("artifact I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
