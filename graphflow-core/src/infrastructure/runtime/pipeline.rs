// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline
//!
//! Composes an ordered sequence of stages, wires an `Outbox` between each
//! consecutive pair, runs every `StageExecutor` concurrently on its own
//! `tokio::spawn`ed task, and aggregates whatever `StageError`s come back
//! into a `PipelineException` — per spec §4.4, in construction order,
//! source first.
//!
//! `Pipeline` never cancels an executor externally (spec §5): the only
//! way a run ends early is the precheck-and-timeout discipline inside
//! each `StageExecutor`, which is what keeps `finish` guarantees intact
//! even on the failure path.

use crate::infrastructure::config::PipelineSettings;
use crate::infrastructure::runtime::failure_observer::FailureObserver;
use crate::infrastructure::runtime::outbox::Outbox;
use crate::infrastructure::runtime::stage_executor::{StageExecutor, StageRole};
use graphflow_domain::error::{PipelineException, StageError};
use std::sync::Arc;

/// An ordered sequence of stages plus the buffer capacity and per-`put`/
/// `get` timeout to run them with.
pub struct Pipeline<T: Send + 'static> {
    stages: Vec<(String, StageRole<T>)>,
    settings: PipelineSettings,
}

impl<T: Send + 'static> Pipeline<T> {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            stages: Vec::new(),
            settings,
        }
    }

    /// Appends a stage. The first stage added must be a `StageRole::Source`
    /// and the last must be a `StageRole::Sink`; `run` does not validate
    /// this — an ill-formed sequence will simply panic the first time an
    /// executor expects an input/output outbox it wasn't given.
    pub fn add_stage(mut self, name: impl Into<String>, role: StageRole<T>) -> Self {
        self.stages.push((name.into(), role));
        self
    }

    /// Wires the outboxes, spawns one task per stage, waits for all of
    /// them, and returns `Err(PipelineException)` if any executor
    /// recorded an error — `Ok(())` otherwise.
    #[tracing::instrument(skip(self), fields(stage_count = self.stages.len()))]
    pub async fn run(self) -> Result<(), PipelineException> {
        let stage_count = self.stages.len();
        let failures = FailureObserver::new(stage_count);

        let outboxes: Vec<Arc<Outbox<T>>> = (0..stage_count.saturating_sub(1))
            .map(|_| Arc::new(Outbox::new(self.settings.buffer_capacity)))
            .collect();

        let mut handles = Vec::with_capacity(stage_count);
        for (index, (name, role)) in self.stages.into_iter().enumerate() {
            let input = (index > 0).then(|| outboxes[index - 1].clone());
            let output = (index + 1 < stage_count).then(|| outboxes[index].clone());
            let executor = StageExecutor::new(
                index,
                name,
                role,
                input,
                output,
                failures.clone(),
                self.settings.stage_timeout,
            );
            handles.push(tokio::spawn(executor.run()));
        }

        let mut errors = Vec::with_capacity(stage_count);
        for handle in handles {
            errors.push(handle.await.expect("stage executor task panicked"));
        }

        if errors.iter().any(|e: &StageError| !e.is_empty()) {
            Err(PipelineException::from_errors(errors))
        } else {
            Ok(())
        }
    }
}
