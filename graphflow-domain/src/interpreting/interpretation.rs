// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Interpretations
//!
//! An `Interpretation` is a leaf of the interpretation tree: it mutates an
//! `InterpreterContext` in place (adds nodes/relationships/properties, or
//! sets a variable). Purely synchronous — interpretations never perform
//! I/O, so they cannot be a suspension point inside the async runtime.
//!
//! The concrete interpretations below (`CreateNodeInterpretation`,
//! `CreateRelationshipInterpretation`, `SetVariableInterpretation`,
//! `SetPropertyInterpretation`) are grounded in nodestream's interpretation
//! vocabulary for record enrichment and exist to exercise the trait and the
//! tests; a production deployment supplies its own.

use crate::interpreting::context::InterpreterContext;
use crate::value_objects::{IndexDescriptor, NodeIdentity, NodeIngest, RelationshipIdentity, RelationshipIngest};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A leaf node of the interpretation tree.
///
/// Implementations are synchronous and infallible by design: an
/// interpretation that cannot proceed (e.g. a missing required field)
/// should leave the context unchanged for that field rather than abort the
/// whole record — a half-built `DesiredIngest` for one record must never
/// take down the pipeline.
pub trait Interpretation: Send + Sync + fmt::Debug {
    /// Mutates `context` in place.
    fn interpret(&self, context: &mut InterpreterContext);

    /// Indexes this interpretation requires the underlying store to have.
    /// Walked once per pipeline run by `Interpreter::gather_used_indexes`.
    /// Default: none.
    fn required_indexes(&self) -> Vec<IndexDescriptor> {
        Vec::new()
    }
}

fn read_key_fields(context: &InterpreterContext, fields: &[String]) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|field| {
            context
                .record()
                .field(field)
                .map(|v| (field.clone(), json_to_key_string(v)))
        })
        .collect()
}

fn json_to_key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Adds (or merges into) a node in the context's `DesiredIngest`, reading
/// its identity fields and a fixed set of properties from the record.
#[derive(Debug, Clone)]
pub struct CreateNodeInterpretation {
    pub node_type: String,
    pub key_fields: Vec<String>,
    pub property_fields: Vec<String>,
    pub require_key_index: bool,
}

impl CreateNodeInterpretation {
    pub fn new(node_type: impl Into<String>, key_fields: Vec<String>) -> Self {
        Self {
            node_type: node_type.into(),
            key_fields,
            property_fields: Vec::new(),
            require_key_index: true,
        }
    }

    pub fn with_properties(mut self, property_fields: Vec<String>) -> Self {
        self.property_fields = property_fields;
        self
    }

    fn identity(&self, context: &InterpreterContext) -> NodeIdentity {
        NodeIdentity::new(self.node_type.clone(), read_key_fields(context, &self.key_fields))
    }
}

impl Interpretation for CreateNodeInterpretation {
    fn interpret(&self, context: &mut InterpreterContext) {
        let identity = self.identity(context);
        let mut ingest = NodeIngest::new(identity);
        for field in &self.property_fields {
            if let Some(value) = context.record().field(field) {
                ingest = ingest.with_property(field.clone(), value.clone());
            }
        }
        context.desired_ingest_mut().add_node(ingest);
    }

    fn required_indexes(&self) -> Vec<IndexDescriptor> {
        if self.require_key_index && !self.key_fields.is_empty() {
            vec![IndexDescriptor::Key(crate::value_objects::KeyIndex::new(
                self.node_type.clone(),
                self.key_fields.clone(),
            ))]
        } else {
            Vec::new()
        }
    }
}

/// Adds (or merges into) a relationship between two node identities whose
/// fields are read from the record, under a common field-name prefix for
/// each endpoint.
#[derive(Debug, Clone)]
pub struct CreateRelationshipInterpretation {
    pub relationship_type: String,
    pub start_type: String,
    pub start_key_fields: Vec<String>,
    pub end_type: String,
    pub end_key_fields: Vec<String>,
    pub property_fields: Vec<String>,
}

impl CreateRelationshipInterpretation {
    pub fn new(
        relationship_type: impl Into<String>,
        start_type: impl Into<String>,
        start_key_fields: Vec<String>,
        end_type: impl Into<String>,
        end_key_fields: Vec<String>,
    ) -> Self {
        Self {
            relationship_type: relationship_type.into(),
            start_type: start_type.into(),
            start_key_fields,
            end_type: end_type.into(),
            end_key_fields,
            property_fields: Vec::new(),
        }
    }
}

impl Interpretation for CreateRelationshipInterpretation {
    fn interpret(&self, context: &mut InterpreterContext) {
        let start = NodeIdentity::new(self.start_type.clone(), read_key_fields(context, &self.start_key_fields));
        let end = NodeIdentity::new(self.end_type.clone(), read_key_fields(context, &self.end_key_fields));
        let identity = RelationshipIdentity {
            relationship_type: self.relationship_type.clone(),
            start,
            end,
        };
        let mut ingest = RelationshipIngest::new(identity);
        for field in &self.property_fields {
            if let Some(value) = context.record().field(field) {
                ingest = ingest.with_property(field.clone(), value.clone());
            }
        }
        context.desired_ingest_mut().add_relationship(ingest);
    }
}

/// Sets a context variable to a fixed JSON value — the simplest possible
/// interpretation, used extensively by the `MultiSequence`/`SingleSequence`
/// isolation and sequencing tests.
#[derive(Debug, Clone)]
pub struct SetVariableInterpretation {
    pub name: String,
    pub value: Value,
}

impl SetVariableInterpretation {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Interpretation for SetVariableInterpretation {
    fn interpret(&self, context: &mut InterpreterContext) {
        context.set_variable(self.name.clone(), self.value.clone());
    }
}

/// Copies the value of a previously-set context variable onto the most
/// recently added node of a given type — demonstrates interpretations
/// observing each other's effects within a `SingleSequence`.
#[derive(Debug, Clone)]
pub struct SetPropertyInterpretation {
    pub node_type: String,
    pub property: String,
    pub variable: String,
}

impl SetPropertyInterpretation {
    pub fn new(node_type: impl Into<String>, property: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            property: property.into(),
            variable: variable.into(),
        }
    }
}

impl Interpretation for SetPropertyInterpretation {
    fn interpret(&self, context: &mut InterpreterContext) {
        let Some(value) = context.variable(&self.variable).cloned() else {
            return;
        };
        let property = self.property.clone();
        let node_type = self.node_type.clone();
        if let Some(node) = context
            .desired_ingest_mut()
            .nodes_mut()
            .iter_mut()
            .rev()
            .find(|n| n.identity.node_type == node_type)
        {
            node.properties.insert(property, value);
        }
    }
}
