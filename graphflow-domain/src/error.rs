// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Error Model
//!
//! `PipelineError` is the single error type every stage operation returns.
//! `ErrorPhase` tags *where* in an executor's lifecycle an error was
//! captured; `StageError` is the per-executor map of phase to error, and
//! `PipelineException` is the ordered collection of `StageError`s a
//! `Pipeline::run` raises when any executor failed.
//!
//! The two fixed message strings (`PRECHECK_MESSAGE`, `TIMEOUT_MESSAGE`) are
//! stable tags, not formatted diagnostics: tests and monitoring match on
//! them directly, so they must never gain interpolated detail.

use std::collections::HashMap;
use std::fmt;

/// Message recorded when an executor aborts because a sibling has already
/// failed (the precheck handshake of the runtime's liveness design).
pub const PRECHECK_MESSAGE: &str = "a peer stage has already failed; aborting";

/// Message recorded when `Outbox::put`/`get` exceeds the stage timeout.
pub const TIMEOUT_MESSAGE: &str = "outbox operation timed out";

/// Errors a stage operation, or the runtime acting on its behalf, can raise.
#[derive(Debug, thiserror::Error, Clone)]
pub enum PipelineError {
    /// `Stage::start` failed.
    #[error("stage start failed: {0}")]
    StartFailed(String),

    /// A stage's record-processing body (`transform`/`write_record`, or the
    /// extractor's record stream) failed.
    #[error("stage processing failed: {0}")]
    ProcessingFailed(String),

    /// `Stage::finish` failed.
    #[error("stage finish failed: {0}")]
    FinishFailed(String),

    /// A peer executor had already failed; this executor aborted cleanly.
    #[error("{PRECHECK_MESSAGE}")]
    Precheck,

    /// `Outbox::put` or `Outbox::get` exceeded its timeout.
    #[error("{TIMEOUT_MESSAGE}")]
    OutboxTimeout,

    /// An attempt to `put` onto an outbox whose sender has already closed.
    #[error("outbox is closed")]
    OutboxClosed,

    /// The interpretation tree's `iterate_on` expression named a field that
    /// is absent, or not an array, on the source record.
    #[error("invalid decomposition: {0}")]
    InvalidDecomposition(String),

    /// A running pipeline was wrapped in an outer deadline that elapsed.
    #[error("pipeline run exceeded its wall-clock deadline")]
    PipelineTimeout,
}

/// Tags the lifecycle phase in which a `PipelineError` was captured.
///
/// `Display` yields the stable tags spec tests and monitoring match against
/// (`START_EXCEPTION`, `WORK_BODY_EXCEPTION`, `STOP_EXCEPTION`) rather than
/// the Rust variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorPhase {
    Start,
    WorkBody,
    Stop,
}

impl fmt::Display for ErrorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ErrorPhase::Start => "START_EXCEPTION",
            ErrorPhase::WorkBody => "WORK_BODY_EXCEPTION",
            ErrorPhase::Stop => "STOP_EXCEPTION",
        };
        f.write_str(tag)
    }
}

/// The errors captured for a single stage executor over one `Pipeline::run`.
///
/// At most one error per phase: a stage either fails its body or it
/// doesn't, and likewise for `start`/`finish`. An executor with an empty
/// `StageError` succeeded.
#[derive(Debug, Clone, Default)]
pub struct StageError {
    stage_name: String,
    exceptions: HashMap<ErrorPhase, PipelineError>,
}

impl StageError {
    pub fn new(stage_name: impl Into<String>) -> Self {
        Self {
            stage_name: stage_name.into(),
            exceptions: HashMap::new(),
        }
    }

    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    pub fn record(&mut self, phase: ErrorPhase, error: PipelineError) {
        self.exceptions.insert(phase, error);
    }

    pub fn get(&self, phase: ErrorPhase) -> Option<&PipelineError> {
        self.exceptions.get(&phase)
    }

    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty()
    }

    pub fn phases(&self) -> impl Iterator<Item = ErrorPhase> + '_ {
        self.exceptions.keys().copied()
    }
}

impl std::ops::Index<ErrorPhase> for StageError {
    type Output = PipelineError;

    fn index(&self, phase: ErrorPhase) -> &Self::Output {
        self.exceptions
            .get(&phase)
            .unwrap_or_else(|| panic!("no {phase} recorded for stage {}", self.stage_name))
    }
}

/// The aggregate failure `Pipeline::run` raises: one `StageError` per
/// executor, in the construction order of the stage sequence (source
/// first).
#[derive(Debug, Clone, Default)]
pub struct PipelineException {
    pub errors: Vec<StageError>,
}

impl fmt::Display for PipelineException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipeline failed: {} stage(s) reported errors", self.errors.iter().filter(|e| !e.is_empty()).count())
    }
}

impl std::error::Error for PipelineException {}

impl PipelineException {
    pub fn from_errors(errors: Vec<StageError>) -> Self {
        Self { errors }
    }

    /// `true` if no executor recorded any error — callers should never see
    /// one of these escape `Pipeline::run`, but it simplifies construction.
    pub fn is_empty(&self) -> bool {
        self.errors.iter().all(StageError::is_empty)
    }
}

impl std::ops::Index<usize> for PipelineException {
    type Output = StageError;

    fn index(&self, i: usize) -> &Self::Output {
        &self.errors[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_phase_display_matches_stable_tags() {
        assert_eq!(ErrorPhase::Start.to_string(), "START_EXCEPTION");
        assert_eq!(ErrorPhase::WorkBody.to_string(), "WORK_BODY_EXCEPTION");
        assert_eq!(ErrorPhase::Stop.to_string(), "STOP_EXCEPTION");
    }

    #[test]
    fn stage_error_index_sugar() {
        let mut err = StageError::new("writer");
        err.record(ErrorPhase::WorkBody, PipelineError::OutboxTimeout);
        assert!(matches!(err[ErrorPhase::WorkBody], PipelineError::OutboxTimeout));
    }

    #[test]
    fn pipeline_exception_preserves_construction_order() {
        let mut src = StageError::new("source");
        src.record(ErrorPhase::WorkBody, PipelineError::Precheck);
        let mut sink = StageError::new("sink");
        sink.record(ErrorPhase::WorkBody, PipelineError::ProcessingFailed("boom".into()));
        let exc = PipelineException::from_errors(vec![src, sink]);
        assert_eq!(exc[0].stage_name(), "source");
        assert_eq!(exc[1].stage_name(), "sink");
    }
}
