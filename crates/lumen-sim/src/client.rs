// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::artifacts::{self, RunArtifacts, GRADIENTS_FILE, GRAD_PREFIX, RUN_PREFIX};
use crate::documents::GradientReport;
use crate::process;
use crate::{Result, SimError};

/// Capability boundary around the external simulator: forward execution and
/// gradient estimation, each returning a structured result or failure.
///
/// Production code drives `lumenctl` through [`CtlSimulator`]; tests
/// substitute an in-process fake so the artifact contract can be exercised
/// without the runtime installed.
pub trait Simulator {
    /// Executes the IR at `ir_path` and resolves the resulting artifact
    /// bundle. Individual bundle documents may be absent; that is the
    /// caller's call to make.
    fn run(&self, ir_path: &Path, seed: Option<u64>) -> Result<RunArtifacts>;

    /// Runs a gradient estimation pass over `params` against the IR at
    /// `ir_path` and parses the resulting gradient document.
    fn estimate_gradient(
        &self,
        ir_path: &Path,
        params: &[String],
        request: &GradientRequest,
    ) -> Result<GradientReport>;
}

/// Options forwarded to the external gradient estimator.
#[derive(Clone, Debug)]
pub struct GradientRequest {
    /// Estimator strategy, passed through uninterpreted; the simulator
    /// validates it.
    pub strategy: String,
    /// RNG seed for deterministic replay.
    pub seed: Option<u64>,
    /// Sample count for stochastic estimators; must be at least one.
    pub samples: u32,
}

impl GradientRequest {
    /// Single-sample finite-difference request, the bridge's backward default.
    pub fn finite_difference(seed: Option<u64>) -> Self {
        Self {
            strategy: "finite_difference".to_string(),
            seed,
            samples: 1,
        }
    }
}

/// [`Simulator`] implementation that shells out to `lumenctl`.
///
/// Artifact bundles are resolved against the scan directory, defaulting to
/// the current working directory at call time, which is where `lumenctl`
/// writes them.
#[derive(Clone, Debug)]
pub struct CtlSimulator {
    program: PathBuf,
    scan_dir: Option<PathBuf>,
}

impl CtlSimulator {
    /// Simulator driving the given executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            scan_dir: None,
        }
    }

    /// Simulator configured from `LUMENCTL_BIN` and `LUMEN_ARTIFACT_DIR`.
    pub fn from_env() -> Self {
        let cfg = lumen_config::simulator::config();
        Self {
            program: cfg.program.clone(),
            scan_dir: cfg.artifact_dir.clone(),
        }
    }

    /// Pins the directory scanned for artifact bundles.
    pub fn with_scan_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scan_dir = Some(dir.into());
        self
    }

    fn scan_dir(&self) -> Result<PathBuf> {
        match &self.scan_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|source| SimError::Io {
                path: PathBuf::from("."),
                source,
            }),
        }
    }
}

impl Simulator for CtlSimulator {
    fn run(&self, ir_path: &Path, seed: Option<u64>) -> Result<RunArtifacts> {
        let mut args = vec![OsString::from("run"), ir_path.as_os_str().to_os_string()];
        if let Some(seed) = seed {
            args.push(OsString::from("--seed"));
            args.push(OsString::from(seed.to_string()));
        }
        process::invoke(&self.program, &args)?;

        let dir = artifacts::latest_artifact_dir(&self.scan_dir()?, RUN_PREFIX, "run")?;
        let bundle = RunArtifacts::resolve(dir);
        let missing = bundle.missing();
        if !missing.is_empty() {
            debug!(missing = ?missing, dir = %bundle.dir.display(), "run bundle is incomplete");
        }
        Ok(bundle)
    }

    fn estimate_gradient(
        &self,
        ir_path: &Path,
        params: &[String],
        request: &GradientRequest,
    ) -> Result<GradientReport> {
        if request.samples == 0 {
            return Err(SimError::InvalidSamples);
        }

        let mut args = vec![
            OsString::from("gradient"),
            ir_path.as_os_str().to_os_string(),
            OsString::from(params.join(",")),
            OsString::from("--strategy"),
            OsString::from(request.strategy.as_str()),
            OsString::from("--samples"),
            OsString::from(request.samples.to_string()),
        ];
        if let Some(seed) = request.seed {
            args.push(OsString::from("--seed"));
            args.push(OsString::from(seed.to_string()));
        }
        process::invoke(&self.program, &args)?;

        let dir = artifacts::latest_artifact_dir(&self.scan_dir()?, GRAD_PREFIX, "gradient")?;
        let path = dir.join(GRADIENTS_FILE);
        if !path.is_file() {
            return Err(SimError::MissingDocument {
                name: GRADIENTS_FILE,
                dir,
            });
        }
        let text = fs::read_to_string(&path).map_err(|source| SimError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|err| SimError::Malformed {
            path,
            message: err.to_string(),
        })
    }
}
