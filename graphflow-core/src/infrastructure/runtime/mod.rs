// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The concurrent staged pipeline runtime: `Outbox`, `FailureObserver`,
//! `StageExecutor`, and `Pipeline`. Everything here is `tokio`-shaped —
//! the domain crate's stage traits are pure ports; this module is the
//! only thing that ever schedules or awaits them.

pub mod failure_observer;
pub mod outbox;
pub mod pipeline;
pub mod stage_executor;

pub use failure_observer::FailureObserver;
pub use outbox::{Outbox, Poll};
pub use pipeline::Pipeline;
pub use stage_executor::{StageExecutor, StageRole};
