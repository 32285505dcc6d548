// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the pipeline's runtime and domain
//! layers and provides the composition-root concerns a binary embedding the
//! pipeline needs before it can call `Pipeline::run`:
//!
//! - **Logging** — a tracing-backed [`logger`] abstraction for bootstrap-phase
//!   messages, usable before the application's own tracing subscriber (see
//!   `graphflow-core::infrastructure::logging`) is installed.
//! - **Shutdown coordination** — [`shutdown::ShutdownCoordinator`] propagates
//!   a cooperative cancellation signal to the host process embedding a
//!   `Pipeline`. The pipeline runtime itself has no external cancellation
//!   (termination is cooperative via precheck + timeouts); this coordinator
//!   is for the surrounding process (e.g. a service that stops accepting new
//!   pipeline runs on SIGTERM), not for reaching into a running
//!   `Pipeline::run` call.
//!
//! CLI argument parsing and OS/platform abstraction, which the teacher crate
//! this module is adapted from carries, are dropped here — they are
//! configuration-parsing and provisioning concerns that are explicit
//! Non-goals of the pipeline this crate bootstraps.

pub mod logger;
pub mod shutdown;

pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};
pub use shutdown::{CancellationToken, ShutdownCoordinator};
