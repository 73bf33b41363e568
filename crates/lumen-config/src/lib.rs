// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of LumenTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Ambient configuration for the LumenTorch gradient bridge.
//!
//! Everything here is an environment-variable snapshot cached behind a
//! `OnceLock`: deterministic replay seeds, the external simulator process
//! knobs, and the tracing subscriber bootstrap. Callers that need different
//! values in one process (tests, mostly) construct the config structs
//! directly instead of going through the cached accessors.

pub mod determinism;
pub mod simulator;
pub mod tracing;
