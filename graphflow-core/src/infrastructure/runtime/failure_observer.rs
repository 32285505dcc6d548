// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Failure Observer
//!
//! The one piece of state every `StageExecutor` in a run shares: has any
//! sibling already failed? One `AtomicBool` per stage, written once
//! (`Release`) the instant that stage records an error and read
//! (`Acquire`) by every executor's precheck. A reader may observe a stale
//! "clean" value for up to one `stage_timeout` cycle — acceptable per
//! spec §5/§9, since the next `put`/`get` timeout re-checks. No general
//! locking is needed because the flag only ever transitions
//! false → true, never back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared, read-only-from-the-outside view over every executor's
/// failure flag in one `Pipeline::run`.
#[derive(Clone)]
pub struct FailureObserver {
    flags: Arc<[AtomicBool]>,
}

impl FailureObserver {
    /// Creates a fresh observer for a run of `stage_count` executors, all
    /// initially clean.
    pub fn new(stage_count: usize) -> Self {
        Self {
            flags: (0..stage_count).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    /// Marks stage `index` as failed. Monotonic: once set, stays set for
    /// the lifetime of this observer.
    pub fn mark_failed(&self, index: usize) {
        self.flags[index].store(true, Ordering::Release);
    }

    /// `true` if any stage in the run has been marked failed.
    pub fn any_failed(&self) -> bool {
        self.flags.iter().any(|flag| flag.load(Ordering::Acquire))
    }
}
