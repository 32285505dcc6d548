// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Value objects: immutable data defined entirely by their contents.

pub mod flow;
pub mod ingest;
pub mod index;
pub mod record;

pub use flow::{IngestionEvent, PipelineRecord};
pub use ingest::{
    DesiredIngest, NodeIdentity, NodeIngest, OperationOnNodeIdentity, OperationOnRelationshipIdentity,
    RelationshipIdentity, RelationshipIngest,
};
pub use index::{FieldIndex, IndexDescriptor, KeyIndex};
pub use record::Record;
