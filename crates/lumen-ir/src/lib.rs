// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Declarative circuit IR documents and named-parameter injection.
//!
//! The bridge interprets only a subset of the IR: node identifiers, node
//! parameter mappings, and the graph metadata mapping. Everything else the
//! simulator understands (ports, measurement modes, conditional branches,
//! vendor extensions) rides through a load/mutate/save cycle untouched via
//! flattened passthrough maps, so injecting parameters can never corrupt
//! structure it does not own.

use std::path::PathBuf;

use thiserror::Error;

mod inject;
mod schema;

pub use inject::Injection;
pub use schema::{Edge, Graph, Node};

pub type Result<T> = std::result::Result<T, IrError>;

/// Errors emitted while loading, validating, or persisting IR documents.
#[derive(Debug, Error)]
pub enum IrError {
    #[error("failed to read IR document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write IR document {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed IR document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },
    #[error("edge references unknown node `{id}`")]
    DanglingEdge { id: String },
}
