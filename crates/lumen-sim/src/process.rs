// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::{Result, SimError};

fn render(program: &Path, args: &[OsString]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Runs the external program to completion, surfacing a non-zero exit as a
/// hard failure.
///
/// Output is neither captured nor parsed; the only guarantee on success is
/// that the process has finished and its artifacts are on disk.
pub(crate) fn invoke(program: &Path, args: &[OsString]) -> Result<()> {
    let command = render(program, args);
    debug!(command = %command, "invoking external simulator");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| SimError::Spawn {
            command: command.clone(),
            source,
        })?;
    if !status.success() {
        return Err(SimError::CommandFailed {
            command,
            code: status.code(),
        });
    }
    Ok(())
}
