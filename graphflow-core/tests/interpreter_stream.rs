// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end scenarios from spec §8 for the Interpreter running inside a
//! real `Pipeline`: indexes lead the stream, and `Flush` passes through
//! untouched rather than being routed through interpretation logic.

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use graphflow_core::interpreting::InterpreterStage;
use graphflow_core::{Envelope, IngestionEvent, Pipeline, PipelineRecord, PipelineSettings, StageRole, Writer};
use graphflow_domain::error::PipelineError;
use graphflow_domain::interpreting::interpretation::CreateNodeInterpretation;
use graphflow_domain::interpreting::{Interpreter, InterpretationPass, RecordDecomposer};
use graphflow_domain::value_objects::Record;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct VecExtractor {
    items: Vec<Envelope<PipelineRecord>>,
}

#[async_trait]
impl graphflow_core::Extractor for VecExtractor {
    type Item = PipelineRecord;

    fn extract_records(&mut self) -> BoxStream<'_, Result<Envelope<PipelineRecord>, PipelineError>> {
        stream::iter(std::mem::take(&mut self.items).into_iter().map(Ok)).boxed()
    }
}

#[derive(Debug, Clone)]
enum Logged {
    Written(PipelineRecord),
    Flushed,
}

struct CapturingWriter {
    log: Arc<Mutex<Vec<Logged>>>,
}

#[async_trait]
impl Writer for CapturingWriter {
    type Item = PipelineRecord;

    async fn write_record(&mut self, record: PipelineRecord) -> Result<(), PipelineError> {
        self.log.lock().unwrap().push(Logged::Written(record));
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), PipelineError> {
        self.log.lock().unwrap().push(Logged::Flushed);
        Ok(())
    }
}

fn identity_interpreter_requiring_one_key_index() -> Interpreter {
    Interpreter::new(
        InterpretationPass::Null,
        RecordDecomposer::Whole,
        InterpretationPass::SingleSequence(vec![Arc::new(CreateNodeInterpretation::new(
            "Person",
            vec!["id".to_string()],
        ))]),
    )
}

/// Scenario 4: with zero input records, the only thing a writer ever sees
/// is the index the interpretation tree requires — emitted once, before
/// the stream ends.
#[tokio::test]
async fn interpreter_emits_its_required_index_even_with_no_records() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let settings = PipelineSettings::new(8, Duration::from_millis(100));
    let pipeline = Pipeline::new(settings)
        .add_stage("extract", StageRole::Source(Box::new(VecExtractor { items: vec![] })))
        .add_stage(
            "interpret",
            StageRole::Middle(Box::new(InterpreterStage::new(identity_interpreter_requiring_one_key_index()))),
        )
        .add_stage("write", StageRole::Sink(Box::new(CapturingWriter { log: log.clone() })));

    pipeline.run().await.expect("an empty input stream is not a failure");

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    match &log[0] {
        Logged::Written(PipelineRecord::Event(IngestionEvent::Index(_))) => {}
        other => panic!("expected the lone index descriptor, got {other:?}"),
    }
}

/// Scenario 5: a `Flush` between two records passes straight through the
/// Interpreter stage (it is never handed to interpretation logic) and
/// reaches the writer's `flush`, in between the two records' ingests.
#[tokio::test]
async fn flush_passes_through_the_interpreter_stage_untouched() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let settings = PipelineSettings::new(8, Duration::from_millis(100));
    let record_a = PipelineRecord::data(Record::new(json!({"id": "a"})));
    let record_b = PipelineRecord::data(Record::new(json!({"id": "b"})));

    let pipeline = Pipeline::new(settings)
        .add_stage(
            "extract",
            StageRole::Source(Box::new(VecExtractor {
                items: vec![Envelope::Item(record_a), Envelope::Flush, Envelope::Item(record_b)],
            })),
        )
        .add_stage(
            "interpret",
            StageRole::Middle(Box::new(InterpreterStage::new(identity_interpreter_requiring_one_key_index()))),
        )
        .add_stage("write", StageRole::Sink(Box::new(CapturingWriter { log: log.clone() })));

    pipeline.run().await.expect("a well-formed stream with a flush is not a failure");

    let log = log.lock().unwrap();
    // The lone required index leads, then ingest(A), then the flush, then ingest(B).
    assert_eq!(log.len(), 4);
    assert!(matches!(&log[0], Logged::Written(PipelineRecord::Event(IngestionEvent::Index(_)))));
    assert!(matches!(&log[1], Logged::Written(PipelineRecord::Event(IngestionEvent::Ingest(_)))));
    assert!(matches!(&log[2], Logged::Flushed));
    assert!(matches!(&log[3], Logged::Written(PipelineRecord::Event(IngestionEvent::Ingest(_)))));
}
