// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Graph Ingestion Pipeline — Runtime
//!
//! The async runtime that drives `graphflow_domain`'s stage ports
//! concurrently: a linear chain of `StageExecutor`s connected by bounded,
//! timeout-aware `Outbox`es, wired and run by `Pipeline`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   Outbox    ┌─────────────┐   Outbox    ┌──────────┐
//! │ Extractor│ ───────────▶│ Interpreter │ ───────────▶│  Writer  │
//! └──────────┘             └─────────────┘             └──────────┘
//!    Source                   Middle                      Sink
//! ```
//!
//! Each box above is wrapped in its own `StageExecutor`, spawned onto its
//! own `tokio` task by `Pipeline::run`. Executors never block each other
//! indefinitely: every `Outbox::put`/`get` is bounded by
//! `PipelineSettings::stage_timeout`, and on every timeout or empty poll
//! an executor re-checks the shared `FailureObserver` before continuing
//! (the "precheck" of spec §4.3) — so a failed sink causes every upstream
//! executor to unwind within a small, fixed number of timeout cycles no
//! matter how large the outbox buffers are.
//!
//! ## Modules
//!
//! - [`infrastructure::runtime`] — `Outbox`, `FailureObserver`,
//!   `StageExecutor`, `Pipeline`: the whole concurrency model.
//! - [`infrastructure::config`] — `PipelineSettings`, the runtime's two
//!   liveness knobs (`buffer_capacity`, `stage_timeout`).
//! - [`infrastructure::logging`] — `tracing-subscriber` wiring.
//! - [`interpreting`] — `InterpreterStage`, the `Transformer` that adapts
//!   `graphflow_domain`'s pure interpretation tree to this runtime.
//!
//! Concrete extractors, transformers, and writers — file/HTTP/iterable
//! sources, the graph-store query/writer layer — are out of this crate's
//! scope, per spec §1: only the port traits they implement
//! (`graphflow_domain::stage`) live here, plus the runtime that drives
//! them.

pub mod infrastructure;
pub mod interpreting;

pub use graphflow_domain::error::{
    ErrorPhase, PipelineError, PipelineException, StageError, PRECHECK_MESSAGE, TIMEOUT_MESSAGE,
};
pub use graphflow_domain::stage::{Envelope, Extractor, Transformer, Writer};
pub use graphflow_domain::value_objects::{DesiredIngest, IngestionEvent, PipelineRecord, Record};

pub use infrastructure::config::PipelineSettings;
pub use infrastructure::runtime::{FailureObserver, Outbox, Pipeline, Poll, StageExecutor, StageRole};
pub use interpreting::InterpreterStage;
