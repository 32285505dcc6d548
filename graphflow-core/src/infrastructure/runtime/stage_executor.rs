// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stage Executor
//!
//! Wraps one `StageRole` — the concrete `Extractor`/`Transformer`/`Writer`
//! a `Pipeline` was built with — together with its input/output outboxes,
//! and drives the `start → work → finish` lifecycle spec §4.3 describes,
//! capturing every failure into a `StageError` rather than letting it
//! unwind the executor's task.
//!
//! The precheck + timed `put`/`get` discipline is what gives the whole
//! pipeline its liveness guarantee (spec §4.3 "Precheck rationale"): a
//! stage re-evaluates `FailureObserver::any_failed` at least once per
//! `stage_timeout`, so a failure anywhere propagates to every other
//! executor within a bounded number of timeout cycles regardless of how
//! full the intervening outboxes are.

use crate::infrastructure::runtime::failure_observer::FailureObserver;
use crate::infrastructure::runtime::outbox::{Outbox, Poll};
use futures::StreamExt;
use graphflow_domain::error::{ErrorPhase, PipelineError, StageError};
use graphflow_domain::stage::{Envelope, Extractor, Transformer, Writer};
use std::sync::Arc;
use std::time::Duration;

/// The concrete stage a `StageExecutor` drives, tagged by position in the
/// pipeline (source / middle / sink) since each position has a distinct
/// lifecycle per spec §4.3.
pub enum StageRole<T: Send + 'static> {
    Source(Box<dyn Extractor<Item = T>>),
    Middle(Box<dyn Transformer<Item = T>>),
    Sink(Box<dyn Writer<Item = T>>),
}

/// Runs one stage for the lifetime of a single `Pipeline::run`, producing
/// the `StageError` that run collects.
pub struct StageExecutor<T: Send + 'static> {
    index: usize,
    name: String,
    role: StageRole<T>,
    input: Option<Arc<Outbox<T>>>,
    output: Option<Arc<Outbox<T>>>,
    failures: FailureObserver,
    stage_timeout: Duration,
}

impl<T: Send + 'static> StageExecutor<T> {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        role: StageRole<T>,
        input: Option<Arc<Outbox<T>>>,
        output: Option<Arc<Outbox<T>>>,
        failures: FailureObserver,
        stage_timeout: Duration,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            role,
            input,
            output,
            failures,
            stage_timeout,
        }
    }

    /// Drives the stage to completion (success, precheck-abort, or
    /// body/timeout failure) and returns the errors it recorded — empty
    /// if the stage succeeded outright.
    #[tracing::instrument(skip(self), fields(stage = %self.name, index = self.index))]
    pub async fn run(self) -> StageError {
        let StageExecutor {
            index,
            name,
            role,
            input,
            output,
            failures,
            stage_timeout,
        } = self;

        let mut error = StageError::new(name);
        match role {
            StageRole::Source(extractor) => {
                run_source(extractor, output, &failures, index, stage_timeout, &mut error).await
            }
            StageRole::Middle(transformer) => {
                run_middle(transformer, input, output, &failures, index, stage_timeout, &mut error).await
            }
            StageRole::Sink(writer) => run_sink(writer, input, &failures, index, stage_timeout, &mut error).await,
        }
        error
    }
}

/// Enqueues `item`, running the precheck first. Returns `false` (and
/// records the appropriate error) if the precheck fires or the `put`
/// itself fails; callers must treat `false` as "stop this executor".
async fn put_checked<T: Send + 'static>(
    output: &Outbox<T>,
    failures: &FailureObserver,
    item: Envelope<T>,
    timeout: Duration,
    error: &mut StageError,
) -> bool {
    if failures.any_failed() {
        error.record(ErrorPhase::WorkBody, PipelineError::Precheck);
        return false;
    }
    match output.put(item, timeout).await {
        Ok(()) => true,
        Err(e) => {
            error.record(ErrorPhase::WorkBody, e);
            false
        }
    }
}

async fn run_source<T: Send + 'static>(
    mut extractor: Box<dyn Extractor<Item = T>>,
    output: Option<Arc<Outbox<T>>>,
    failures: &FailureObserver,
    self_index: usize,
    stage_timeout: Duration,
    error: &mut StageError,
) {
    let output = output.expect("a source executor always has an output outbox");

    if let Err(e) = extractor.start().await {
        error.record(ErrorPhase::Start, e);
        failures.mark_failed(self_index);
        output.close().await;
        return;
    }

    {
        let mut stream = extractor.extract_records();
        loop {
            match stream.next().await {
                Some(Ok(envelope)) => {
                    if !put_checked(&output, failures, envelope, stage_timeout, error).await {
                        failures.mark_failed(self_index);
                        break;
                    }
                }
                Some(Err(e)) => {
                    error.record(ErrorPhase::WorkBody, e);
                    failures.mark_failed(self_index);
                    break;
                }
                None => break,
            }
        }
    }

    if let Err(e) = extractor.finish().await {
        error.record(ErrorPhase::Stop, e);
    }
    output.close().await;
}

async fn run_middle<T: Send + 'static>(
    mut transformer: Box<dyn Transformer<Item = T>>,
    input: Option<Arc<Outbox<T>>>,
    output: Option<Arc<Outbox<T>>>,
    failures: &FailureObserver,
    self_index: usize,
    stage_timeout: Duration,
    error: &mut StageError,
) {
    let input = input.expect("a middle executor always has an input outbox");
    let output = output.expect("a middle executor always has an output outbox");

    let started = match transformer.start().await {
        Ok(()) => true,
        Err(e) => {
            error.record(ErrorPhase::Start, e);
            failures.mark_failed(self_index);
            false
        }
    };

    if started {
        'work: {
            match transformer.leading_items().await {
                Ok(items) => {
                    for item in items {
                        if !put_checked(&output, failures, Envelope::Item(item), stage_timeout, error).await {
                            failures.mark_failed(self_index);
                            break 'work;
                        }
                    }
                }
                Err(e) => {
                    error.record(ErrorPhase::WorkBody, e);
                    failures.mark_failed(self_index);
                    break 'work;
                }
            }

            loop {
                match input.get(stage_timeout).await {
                    Poll::Empty => {
                        if failures.any_failed() {
                            error.record(ErrorPhase::WorkBody, PipelineError::Precheck);
                            failures.mark_failed(self_index);
                            break;
                        }
                    }
                    Poll::End => break,
                    Poll::Delivered(Envelope::Flush) => {
                        if !put_checked(&output, failures, Envelope::Flush, stage_timeout, error).await {
                            failures.mark_failed(self_index);
                            break;
                        }
                    }
                    Poll::Delivered(Envelope::Item(item)) => match transformer.transform(item).await {
                        Ok(produced) => {
                            let mut stopped = false;
                            for out_item in produced {
                                if !put_checked(&output, failures, Envelope::Item(out_item), stage_timeout, error).await
                                {
                                    stopped = true;
                                    break;
                                }
                            }
                            if stopped {
                                failures.mark_failed(self_index);
                                break;
                            }
                        }
                        Err(e) => {
                            error.record(ErrorPhase::WorkBody, e);
                            failures.mark_failed(self_index);
                            break;
                        }
                    },
                }
            }
        }

        if let Err(e) = transformer.finish().await {
            error.record(ErrorPhase::Stop, e);
        }
    }

    output.close().await;
}

async fn run_sink<T: Send + 'static>(
    mut writer: Box<dyn Writer<Item = T>>,
    input: Option<Arc<Outbox<T>>>,
    failures: &FailureObserver,
    self_index: usize,
    stage_timeout: Duration,
    error: &mut StageError,
) {
    let input = input.expect("a sink executor always has an input outbox");

    let started = match writer.start().await {
        Ok(()) => true,
        Err(e) => {
            error.record(ErrorPhase::Start, e);
            failures.mark_failed(self_index);
            false
        }
    };

    if started {
        loop {
            match input.get(stage_timeout).await {
                Poll::Empty => {
                    if failures.any_failed() {
                        error.record(ErrorPhase::WorkBody, PipelineError::Precheck);
                        failures.mark_failed(self_index);
                        break;
                    }
                }
                Poll::End => break,
                Poll::Delivered(Envelope::Flush) => {
                    if let Err(e) = writer.flush().await {
                        error.record(ErrorPhase::WorkBody, e);
                        failures.mark_failed(self_index);
                        break;
                    }
                }
                Poll::Delivered(Envelope::Item(item)) => {
                    if let Err(e) = writer.write_record(item).await {
                        error.record(ErrorPhase::WorkBody, e);
                        failures.mark_failed(self_index);
                        break;
                    }
                }
            }
        }

        if let Err(e) = writer.finish().await {
            error.record(ErrorPhase::Stop, e);
        }
    }
}
