// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tracing Setup
//!
//! Installs a `tracing-subscriber` global subscriber for the pipeline
//! runtime. `StageExecutor` and `Pipeline` emit spans and events at stage
//! boundaries (`#[tracing::instrument]` on `StageExecutor::run`, `debug!`
//! at put/get/precheck/timeout decision points) regardless of whether a
//! subscriber has been installed; calling [`init`] just gives those events
//! somewhere to go.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a global tracing subscriber reading its filter from
/// `RUST_LOG`, defaulting to `info` when unset.
///
/// Returns an error rather than panicking if a subscriber is already
/// installed (tests that run multiple pipelines within one process should
/// call this at most once, typically via `std::sync::Once`).
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(fmt::layer()).try_init()
}
