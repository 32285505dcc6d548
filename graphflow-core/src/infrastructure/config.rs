// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Settings
//!
//! `PipelineSettings` carries the two knobs the runtime actually needs:
//! the outbox buffer capacity `B` and the `put`/`get` timeout every
//! `StageExecutor` uses (spec §5 — "small and fixed, ≈ 100ms"). This is
//! configuration *of* the runtime's liveness parameters, not the
//! declarative pipeline-definition parsing spec §1 excludes — no stage
//! graph, no interpretation tree, lives here.
//!
//! Loadable from environment variables (prefix `GRAPHFLOW_`) or a TOML
//! file via the `config` crate, following the layered-sources pattern the
//! teacher crate's own `infrastructure::config` module uses.

use serde::Deserialize;
use std::time::Duration;

/// The default outbox capacity when nothing overrides it. Arbitrary but
/// generous enough that short bursts don't immediately contend with the
/// timeout; the spec places no requirement on a default value (§5: "not a
/// correctness parameter").
pub const DEFAULT_BUFFER_CAPACITY: usize = 16;

/// The default `put`/`get` timeout — spec §5's "≈ 100ms".
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_millis(100);

/// Runtime-level settings for one `Pipeline::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub buffer_capacity: usize,
    pub stage_timeout: Duration,
}

impl PipelineSettings {
    pub fn new(buffer_capacity: usize, stage_timeout: Duration) -> Self {
        Self {
            buffer_capacity: buffer_capacity.max(1),
            stage_timeout,
        }
    }

    /// Loads settings from the process environment (`GRAPHFLOW_BUFFER_CAPACITY`,
    /// `GRAPHFLOW_STAGE_TIMEOUT_MS`) and any `graphflow.toml` in the current
    /// directory, falling back to the defaults above for anything unset.
    pub fn load() -> Result<Self, config::ConfigError> {
        let raw: RawSettings = config::Config::builder()
            .set_default("buffer_capacity", DEFAULT_BUFFER_CAPACITY as i64)?
            .set_default("stage_timeout_ms", DEFAULT_STAGE_TIMEOUT.as_millis() as i64)?
            .add_source(config::File::with_name("graphflow").required(false))
            .add_source(config::Environment::with_prefix("GRAPHFLOW"))
            .build()?
            .try_deserialize()?;

        Ok(Self::new(raw.buffer_capacity, Duration::from_millis(raw.stage_timeout_ms)))
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY, DEFAULT_STAGE_TIMEOUT)
    }
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    buffer_capacity: usize,
    stage_timeout_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_recommendations() {
        let settings = PipelineSettings::default();
        assert_eq!(settings.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert_eq!(settings.stage_timeout, DEFAULT_STAGE_TIMEOUT);
    }

    #[test]
    fn new_rejects_a_zero_capacity() {
        let settings = PipelineSettings::new(0, Duration::from_millis(50));
        assert_eq!(settings.buffer_capacity, 1);
    }
}
