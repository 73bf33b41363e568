// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::{Result, SimError};

/// Directory name prefix of bundles written by `lumenctl run`.
pub const RUN_PREFIX: &str = "lumen_run_";
/// Directory name prefix of bundles written by `lumenctl gradient`.
pub const GRAD_PREFIX: &str = "lumen_grad_";

pub(crate) const IR_FILE: &str = "ir.json";
pub(crate) const RESULTS_FILE: &str = "results.json";
pub(crate) const TRACE_FILE: &str = "trace.json";
pub(crate) const METADATA_FILE: &str = "metadata.json";
pub(crate) const GRADIENTS_FILE: &str = "gradients.json";

/// Artifact bundle produced by one `run` invocation.
///
/// Absent documents are represented, not raised; only the results document
/// is later treated as fatal, and by the autograd bridge rather than here.
#[derive(Clone, Debug)]
pub struct RunArtifacts {
    /// Bundle directory the documents below live in.
    pub dir: PathBuf,
    /// Snapshot of the IR the simulator actually executed.
    pub ir: Option<PathBuf>,
    /// Ordered per-node results document.
    pub results: Option<PathBuf>,
    /// Execution trace document.
    pub trace: Option<PathBuf>,
    /// Run metadata document.
    pub metadata: Option<PathBuf>,
}

impl RunArtifacts {
    pub(crate) fn resolve(dir: PathBuf) -> Self {
        let find = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };
        Self {
            ir: find(IR_FILE),
            results: find(RESULTS_FILE),
            trace: find(TRACE_FILE),
            metadata: find(METADATA_FILE),
            dir,
        }
    }

    /// Names of expected documents absent from the bundle.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (IR_FILE, self.ir.is_none()),
            (RESULTS_FILE, self.results.is_none()),
            (TRACE_FILE, self.trace.is_none()),
            (METADATA_FILE, self.metadata.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect()
    }
}

/// Maps each expected filename to its absolute path when present in `dir`,
/// or `None` when absent. Callers decide whether a missing file is fatal.
pub fn resolve_files(dir: &Path, names: &[&str]) -> BTreeMap<String, Option<PathBuf>> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            (name.to_string(), path.is_file().then_some(path))
        })
        .collect()
}

/// Picks the most recently modified immediate subdirectory of `base` whose
/// name starts with `prefix`.
///
/// Timestamp ties are broken lexicographically on the path so repeated scans
/// over an unchanged directory stay deterministic. Two bundles finishing
/// within the filesystem's timestamp granularity can therefore be confused;
/// concurrent invocations must use distinct working directories.
pub fn latest_artifact_dir(base: &Path, prefix: &str, kind: &'static str) -> Result<PathBuf> {
    let entries = fs::read_dir(base).map_err(|source| SimError::Io {
        path: base.to_path_buf(),
        source,
    })?;

    let mut best: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|source| SimError::Io {
            path: base.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(prefix) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let better = match &best {
            None => true,
            Some((when, chosen)) => modified > *when || (modified == *when && path > *chosen),
        };
        if better {
            best = Some((modified, path));
        }
    }

    match best {
        Some((_, path)) => {
            debug!(dir = %path.display(), kind, "resolved artifact bundle");
            Ok(path)
        }
        None => Err(SimError::ArtifactNotFound {
            kind,
            prefix: prefix.to_string(),
            dir: base.to_path_buf(),
        }),
    }
}
