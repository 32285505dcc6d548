// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stage Contract
//!
//! Three port traits — `Extractor`, `Transformer`, `Writer` — that every
//! concrete stage (file/HTTP/iterable extractors, transformers, graph-store
//! writers) honors. Concrete implementations are out of this crate's scope;
//! only the contracts they must satisfy live here. `graphflow-core`'s
//! `StageExecutor` is the only caller of these traits.
//!
//! All three share the lifecycle `start → work → finish` from the spec:
//! `start`/`finish` default to no-ops so a stage only overrides what it
//! needs. `finish` runs exactly once, after the last record or after abort
//! — see `DESIGN.md` for the resolution of "does `finish` run after a
//! failed `start`" (it does not).
//!
//! `Envelope<T>` is the `Record | Flush` sum every stage operation that
//! crosses an outbox deals in. It lives here, not in the runtime crate that
//! owns the outbox, because the `Extractor` contract needs it: a source can
//! legitimately emit `Flush` into the pipeline (spec §8 scenario 5), so the
//! type has to be nameable from a pure, `tokio`-free trait definition.

use crate::error::PipelineError;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// A `Record | Flush` token, the unit every outbox, executor, and stage
/// operation that crosses a stage boundary deals in.
///
/// Modeled as an enum variant rather than a singleton sentinel value:
/// Rust's exhaustiveness checking makes `Item`/`Flush` distinct at compile
/// time, which satisfies the spec's "identity-comparable, cannot collide
/// with any record value" requirement (§9) more strongly than a runtime
/// sentinel object could.
#[derive(Debug, Clone)]
pub enum Envelope<T> {
    Item(T),
    Flush,
}

impl<T> Envelope<T> {
    pub fn is_flush(&self) -> bool {
        matches!(self, Envelope::Flush)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Item(t) => Envelope::Item(f(t)),
            Envelope::Flush => Envelope::Flush,
        }
    }
}

/// Source stage: pulls records (or forwards a pre-existing `Flush`) from
/// outside the pipeline. Not restartable — `extract_records` is called
/// exactly once per `StageExecutor::run`.
#[async_trait]
pub trait Extractor: Send + Sync {
    type Item: Send + 'static;

    /// One-time setup, executed before any record. Default: no-op.
    async fn start(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// A lazy, possibly-infinite stream of records. The only suspension
    /// point an extractor's own I/O introduces. A `Some(Err(_))` item
    /// ends the stream with a `WORK_BODY_EXCEPTION` (spec §4.3 source
    /// variant, step 4) — the executor does not poll further after one.
    fn extract_records(&mut self) -> BoxStream<'_, Result<Envelope<Self::Item>, PipelineError>>;

    /// One-time teardown. Runs exactly once after the stream ends or the
    /// executor aborts, provided `start` succeeded. Default: no-op.
    async fn finish(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Middle stage: transforms each record into zero-or-more output records.
/// The Interpreter is the paradigm `Transformer` — see
/// `graphflow-core::interpreting::InterpreterStage`.
#[async_trait]
pub trait Transformer: Send + Sync {
    type Item: Send + 'static;

    /// One-time setup. Default: no-op.
    async fn start(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Items to emit before any input record is processed — e.g. the
    /// Interpreter's index descriptors (spec §4.5 item 1). Default: none.
    async fn leading_items(&mut self) -> Result<Vec<Self::Item>, PipelineError> {
        Ok(Vec::new())
    }

    /// Transforms one record into zero-or-more output records. Never
    /// called for `Envelope::Flush` — the executor forwards `Flush`
    /// without invoking stage logic, per the stage contract.
    async fn transform(&mut self, record: Self::Item) -> Result<Vec<Self::Item>, PipelineError>;

    /// One-time teardown, run once provided `start` succeeded. Default:
    /// no-op.
    async fn finish(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Sink stage: consumes records, writing them to an external store.
#[async_trait]
pub trait Writer: Send + Sync {
    type Item: Send + 'static;

    /// One-time setup. Default: no-op.
    async fn start(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Writes one record. No return value: a writer signals failure only
    /// through `Err`.
    async fn write_record(&mut self, record: Self::Item) -> Result<(), PipelineError>;

    /// Flushes any buffered, not-yet-durable writes. Invoked by the
    /// executor whenever `Envelope::Flush` arrives on the input outbox.
    /// Default: no-op (a writer with no internal buffering has nothing to
    /// flush).
    async fn flush(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// One-time teardown, run once provided `start` succeeded. Default:
    /// no-op.
    async fn finish(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_flush_is_distinguishable_from_any_item() {
        let flush: Envelope<i32> = Envelope::Flush;
        let item: Envelope<i32> = Envelope::Item(0);
        assert!(flush.is_flush());
        assert!(!item.is_flush());
    }

    #[test]
    fn envelope_map_preserves_flush() {
        let flush: Envelope<i32> = Envelope::Flush;
        let mapped = flush.map(|n| n + 1);
        assert!(mapped.is_flush());
    }
}
