// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Ingestion Event Stream
//!
//! The items the Interpreter emits downstream of it, and the crate-wide
//! flow type every stage of a graph-ingestion pipeline actually moves:
//! raw `Record`s upstream of the Interpreter, `IngestionEvent`s downstream
//! of it. Keeping both cases in one enum lets a single `Outbox<PipelineRecord>`
//! wire the whole chain instead of needing a type change at the Interpreter
//! boundary.

use crate::value_objects::{DesiredIngest, IndexDescriptor, Record};

/// An item the Interpreter emits, in the order spec §4.5/§6 requires:
/// every `Index` before any `Ingest`.
#[derive(Debug, Clone)]
pub enum IngestionEvent {
    /// An index the underlying store should have, gathered once per run
    /// from the interpretation tree before any record is processed.
    Index(IndexDescriptor),
    /// The graph intent derived from one (sub-context of a) record.
    Ingest(DesiredIngest),
}

/// The value every stage in a graph-ingestion pipeline exchanges.
///
/// Extractors and pre-Interpreter transformers produce `Data`; the
/// Interpreter consumes `Data` and produces `Event`; writers consume
/// `Event`. Modeling both in one enum (rather than changing the pipeline's
/// item type at the Interpreter boundary) keeps `Outbox<T>`/`StageExecutor<T>`
/// usable unchanged across the whole chain.
#[derive(Debug, Clone)]
pub enum PipelineRecord {
    Data(Record),
    Event(IngestionEvent),
}

impl PipelineRecord {
    pub fn data(record: impl Into<Record>) -> Self {
        PipelineRecord::Data(record.into())
    }

    pub fn index(descriptor: impl Into<IndexDescriptor>) -> Self {
        PipelineRecord::Event(IngestionEvent::Index(descriptor.into()))
    }

    pub fn ingest(ingest: DesiredIngest) -> Self {
        PipelineRecord::Event(IngestionEvent::Ingest(ingest))
    }

    /// The raw record, if this is a pre-Interpreter item.
    pub fn as_data(&self) -> Option<&Record> {
        match self {
            PipelineRecord::Data(record) => Some(record),
            PipelineRecord::Event(_) => None,
        }
    }

    /// The ingestion event, if this is a post-Interpreter item.
    pub fn as_event(&self) -> Option<&IngestionEvent> {
        match self {
            PipelineRecord::Data(_) => None,
            PipelineRecord::Event(event) => Some(event),
        }
    }
}
