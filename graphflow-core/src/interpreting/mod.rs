// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Interpreter Stage
//!
//! Adapts `graphflow_domain::interpreting::Interpreter` — the pure,
//! synchronous interpretation tree — to the async `Transformer` port, so
//! a `Pipeline<PipelineRecord>` can run it as its middle stage like any
//! other transformer. All the actual interpretation logic lives in the
//! domain crate; this type is purely wiring (spec §4.5).

use async_trait::async_trait;
use graphflow_domain::error::PipelineError;
use graphflow_domain::interpreting::Interpreter;
use graphflow_domain::stage::Transformer;
use graphflow_domain::value_objects::{IngestionEvent, PipelineRecord};

/// The `Transformer` that drives one `Interpreter` over the pipeline's
/// `PipelineRecord` stream.
pub struct InterpreterStage {
    interpreter: Interpreter,
}

impl InterpreterStage {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }
}

#[async_trait]
impl Transformer for InterpreterStage {
    type Item = PipelineRecord;

    /// Emits every index the interpretation tree requires, once, before
    /// any data record — spec §4.5 item 1.
    async fn leading_items(&mut self) -> Result<Vec<PipelineRecord>, PipelineError> {
        Ok(self
            .interpreter
            .gather_used_indexes()
            .into_iter()
            .map(PipelineRecord::index)
            .collect())
    }

    /// Interprets one record into zero-or-more `DesiredIngest`s, in
    /// decomposition order then interpretation order within each
    /// sub-context (spec §4.5's ordering contract). `Envelope::Flush` is
    /// never routed here — the executor forwards it directly.
    async fn transform(&mut self, record: PipelineRecord) -> Result<Vec<PipelineRecord>, PipelineError> {
        let PipelineRecord::Data(record) = record else {
            return Err(PipelineError::ProcessingFailed(
                "the interpreter only transforms raw records; ingestion events never re-enter it".into(),
            ));
        };

        let ingests = self.interpreter.interpret_record(record)?;
        Ok(ingests.into_iter().map(PipelineRecord::ingest).collect())
    }
}

/// Picks `DesiredIngest`s back out of a mixed `PipelineRecord` stream,
/// for test assertions and for writers that only care about ingests.
pub fn ingests_only(records: &[PipelineRecord]) -> Vec<&graphflow_domain::value_objects::DesiredIngest> {
    records
        .iter()
        .filter_map(|r| match r.as_event() {
            Some(IngestionEvent::Ingest(ingest)) => Some(ingest),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphflow_domain::interpreting::interpretation::CreateNodeInterpretation;
    use graphflow_domain::interpreting::{InterpretationPass, RecordDecomposer};
    use graphflow_domain::value_objects::Record;
    use serde_json::json;
    use std::sync::Arc;

    fn interpreter() -> Interpreter {
        Interpreter::new(
            InterpretationPass::Null,
            RecordDecomposer::Whole,
            InterpretationPass::SingleSequence(vec![Arc::new(CreateNodeInterpretation::new(
                "Person",
                vec!["id".to_string()],
            ))]),
        )
    }

    #[tokio::test]
    async fn leading_items_emits_indexes_before_any_record() {
        let mut stage = InterpreterStage::new(interpreter());
        let leading = stage.leading_items().await.unwrap();
        assert_eq!(leading.len(), 1);
        assert!(matches!(
            leading[0].as_event(),
            Some(IngestionEvent::Index(_))
        ));
    }

    #[tokio::test]
    async fn transform_yields_one_ingest_event_per_record() {
        let mut stage = InterpreterStage::new(interpreter());
        let record = PipelineRecord::data(Record::new(json!({"id": "1"})));
        let produced = stage.transform(record).await.unwrap();
        assert_eq!(produced.len(), 1);
        assert!(matches!(produced[0].as_event(), Some(IngestionEvent::Ingest(_))));
    }

    #[tokio::test]
    async fn transform_rejects_an_already_interpreted_event() {
        let mut stage = InterpreterStage::new(interpreter());
        let event = PipelineRecord::index(graphflow_domain::value_objects::IndexDescriptor::Key(
            graphflow_domain::value_objects::KeyIndex::new("Person", vec!["id".to_string()]),
        ));
        assert!(stage.transform(event).await.is_err());
    }
}
