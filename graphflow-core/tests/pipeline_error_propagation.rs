// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end concurrency scenarios from spec §8: a slow or wedged stage
//! must not let the pipeline hang, and each scenario's failure must land
//! on the executor(s) the spec predicts.

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use graphflow_core::{
    Envelope, ErrorPhase, PipelineError, PipelineSettings, StageRole, Transformer, Writer, PRECHECK_MESSAGE,
    TIMEOUT_MESSAGE,
};
use std::time::Duration;

struct ExtractQuickly;

#[async_trait]
impl graphflow_core::Extractor for ExtractQuickly {
    type Item = i32;

    fn extract_records(&mut self) -> BoxStream<'_, Result<Envelope<i32>, PipelineError>> {
        stream::iter(0..).map(|n| Ok(Envelope::Item(n))).boxed()
    }
}

struct ExtractSlowly {
    next: i32,
}

#[async_trait]
impl graphflow_core::Extractor for ExtractSlowly {
    type Item = i32;

    fn extract_records(&mut self) -> BoxStream<'_, Result<Envelope<i32>, PipelineError>> {
        stream::unfold(self.next, |n| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Some((Ok(Envelope::Item(n)), n + 1))
        })
        .boxed()
    }
}

struct PassThrough;

#[async_trait]
impl Transformer for PassThrough {
    type Item = i32;

    async fn transform(&mut self, record: i32) -> Result<Vec<i32>, PipelineError> {
        Ok(vec![record])
    }
}

/// Throws from `finish` instead of `transform` — exercises the
/// `STOP_EXCEPTION` phase (spec §8 scenario 3).
struct FailOnFinish;

#[async_trait]
impl Transformer for FailOnFinish {
    type Item = i32;

    async fn transform(&mut self, record: i32) -> Result<Vec<i32>, PipelineError> {
        Ok(vec![record])
    }

    async fn finish(&mut self) -> Result<(), PipelineError> {
        Err(PipelineError::FinishFailed("teardown intentionally fails".into()))
    }
}

struct EventualFailureWriter;

#[async_trait]
impl Writer for EventualFailureWriter {
    type Item = i32;

    async fn write_record(&mut self, _record: i32) -> Result<(), PipelineError> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Err(PipelineError::ProcessingFailed("writer eventually fails".into()))
    }
}

struct ImmediateFailureWriter;

#[async_trait]
impl Writer for ImmediateFailureWriter {
    type Item = i32;

    async fn write_record(&mut self, _record: i32) -> Result<(), PipelineError> {
        Err(PipelineError::ProcessingFailed("writer fails immediately".into()))
    }
}

/// Scenario 1: a fast source and a writer that stalls for 3s before
/// failing must not deadlock even with its outbox full; upstream stages
/// should time out waiting for room rather than block forever.
#[tokio::test]
async fn full_buffer_propagation_does_not_deadlock() {
    let settings = PipelineSettings::new(20, Duration::from_millis(100));
    let pipeline = graphflow_core::Pipeline::new(settings)
        .add_stage("extract", StageRole::Source(Box::new(ExtractQuickly)))
        .add_stage("interpret", StageRole::Middle(Box::new(PassThrough)))
        .add_stage("write", StageRole::Sink(Box::new(EventualFailureWriter)));

    let result = tokio::time::timeout(Duration::from_millis(6400), pipeline.run())
        .await
        .expect("pipeline must not hang past the spec's 6.4s bound");
    let exception = result.expect_err("a stalled, failing writer must surface a PipelineException");

    assert_eq!(exception.errors.len(), 3);
    assert!(matches!(
        exception.errors[0].get(ErrorPhase::WorkBody),
        Some(PipelineError::OutboxTimeout)
    ));
    assert_eq!(exception.errors[0].get(ErrorPhase::WorkBody).unwrap().to_string(), TIMEOUT_MESSAGE);
    assert!(matches!(
        exception.errors[1].get(ErrorPhase::WorkBody),
        Some(PipelineError::OutboxTimeout)
    ));
}

/// Scenario 2: a slow source paired with a writer that fails on its very
/// first record should propagate failure almost immediately — the
/// source's own `put` never even gets a chance to time out, it aborts on
/// the next precheck instead.
#[tokio::test]
async fn immediate_failure_on_slow_source_propagates_via_precheck() {
    let settings = PipelineSettings::new(20, Duration::from_millis(100));
    let pipeline = graphflow_core::Pipeline::new(settings)
        .add_stage("extract", StageRole::Source(Box::new(ExtractSlowly { next: 0 })))
        .add_stage("interpret", StageRole::Middle(Box::new(PassThrough)))
        .add_stage("write", StageRole::Sink(Box::new(ImmediateFailureWriter)));

    let result = tokio::time::timeout(Duration::from_millis(800), pipeline.run())
        .await
        .expect("pipeline must not hang past the spec's 0.8s bound");
    let exception = result.expect_err("an immediately-failing writer must surface a PipelineException");

    assert_eq!(exception.errors.len(), 3);
    assert!(matches!(exception.errors[0].get(ErrorPhase::WorkBody), Some(PipelineError::Precheck)));
    assert_eq!(exception.errors[0].get(ErrorPhase::WorkBody).unwrap().to_string(), PRECHECK_MESSAGE);
    assert!(exception.errors.last().unwrap().get(ErrorPhase::WorkBody).is_some());
}

/// Scenario 3: a deep chain (source, ten pass-throughs, one transformer
/// that fails its teardown, an immediately-failing writer) still
/// terminates promptly, and the failure lands on the phases the spec
/// names for each role.
#[tokio::test]
async fn deep_chain_propagation_reports_the_right_phase_per_stage() {
    let settings = PipelineSettings::new(20, Duration::from_millis(100));
    let mut pipeline = graphflow_core::Pipeline::new(settings).add_stage(
        "extract",
        StageRole::Source(Box::new(ExtractSlowly { next: 0 })),
    );
    for i in 0..10 {
        pipeline = pipeline.add_stage(format!("passthrough-{i}"), StageRole::Middle(Box::new(PassThrough)));
    }
    pipeline = pipeline
        .add_stage("fail-on-finish", StageRole::Middle(Box::new(FailOnFinish)))
        .add_stage("write", StageRole::Sink(Box::new(ImmediateFailureWriter)));

    let result = tokio::time::timeout(Duration::from_millis(800), pipeline.run())
        .await
        .expect("pipeline must not hang past the spec's 0.8s bound");
    let exception = result.expect_err("the chain must surface a PipelineException");

    assert_eq!(exception.errors.len(), 13);
    assert!(matches!(exception.errors[0].get(ErrorPhase::WorkBody), Some(PipelineError::Precheck)));
    assert!(matches!(
        exception.errors[11].get(ErrorPhase::Stop),
        Some(PipelineError::FinishFailed(_))
    ));
    assert!(exception.errors[12].get(ErrorPhase::WorkBody).is_some());
}
