// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Graph Ingestion Pipeline — Domain Layer
//!
//! Pure, synchronous business logic for the graph ingestion pipeline: the
//! data model (`Record`, `DesiredIngest`, `IndexDescriptor`), the error
//! model (`PipelineError`, `StageError`, `PipelineException`), the stage
//! port traits (`Extractor`, `Transformer`, `Writer`) concrete stages
//! implement, and the entire interpretation tree.
//!
//! This crate has no `tokio` dependency: the stage traits are `async` only
//! because extractors/writers do I/O, not because anything here schedules
//! concurrent work. `graphflow-core` owns the runtime that drives these
//! traits concurrently.

pub mod error;
pub mod interpreting;
pub mod stage;
pub mod value_objects;

pub use error::{ErrorPhase, PipelineError, PipelineException, StageError, PRECHECK_MESSAGE, TIMEOUT_MESSAGE};
pub use stage::{Envelope, Extractor, Transformer, Writer};
pub use value_objects::{
    DesiredIngest, FieldIndex, IndexDescriptor, IngestionEvent, KeyIndex, NodeIdentity, NodeIngest,
    OperationOnNodeIdentity, OperationOnRelationshipIdentity, PipelineRecord, Record, RelationshipIdentity,
    RelationshipIngest,
};
