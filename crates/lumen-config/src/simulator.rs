// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Snapshot of the external simulator process configuration.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Executable invoked for the `run` and `gradient` subcommands.
    pub program: PathBuf,
    /// Directory scanned for artifact bundles. When unset, bundles are
    /// resolved against the current working directory at call time, which is
    /// where the simulator writes them.
    pub artifact_dir: Option<PathBuf>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("lumenctl"),
            artifact_dir: None,
        }
    }
}

impl SimulatorConfig {
    /// Builds a configuration snapshot from environment variables.
    fn from_env() -> Self {
        let program = std::env::var_os("LUMENCTL_BIN")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("lumenctl"));

        let artifact_dir = std::env::var_os("LUMEN_ARTIFACT_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            program,
            artifact_dir,
        }
    }
}

static CONFIG: OnceLock<SimulatorConfig> = OnceLock::new();

/// Returns the lazily initialised simulator process configuration.
pub fn config() -> &'static SimulatorConfig {
    CONFIG.get_or_init(SimulatorConfig::from_env)
}

/// Overrides the simulator configuration. Intended for tests; the first
/// caller wins, matching `OnceLock` semantics.
pub fn configure(cfg: SimulatorConfig) -> &'static SimulatorConfig {
    CONFIG.get_or_init(|| cfg)
}
