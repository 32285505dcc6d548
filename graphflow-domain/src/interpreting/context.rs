// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Interpreter Context
//!
//! The per-record scratchpad Interpretations mutate: the source `Record`,
//! the `DesiredIngest` accumulator, and a variable store. `deep_copy`
//! duplicates all of it so that `MultiSequence` branches and decomposed
//! sub-contexts never observe each other's writes.

use crate::value_objects::{DesiredIngest, Record};
use serde_json::Value;
use std::collections::HashMap;

/// The mutable working set consumed and produced by `Interpretation`s while
/// processing one record (or one decomposed sub-context of a record).
#[derive(Debug, Clone)]
pub struct InterpreterContext {
    record: Record,
    desired_ingest: DesiredIngest,
    variables: HashMap<String, Value>,
}

impl InterpreterContext {
    /// Creates a fresh context for a newly-arrived record, with an empty
    /// ingest accumulator and no variables set.
    pub fn from_record(record: Record) -> Self {
        Self {
            record,
            desired_ingest: DesiredIngest::new(),
            variables: HashMap::new(),
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Replaces the context's record — used by `RecordDecomposer::IterateOn`
    /// to point a sub-context at one element of the parent's collection.
    pub fn set_record(&mut self, record: Record) {
        self.record = record;
    }

    pub fn desired_ingest(&self) -> &DesiredIngest {
        &self.desired_ingest
    }

    pub fn desired_ingest_mut(&mut self) -> &mut DesiredIngest {
        &mut self.desired_ingest
    }

    pub fn into_desired_ingest(self) -> DesiredIngest {
        self.desired_ingest
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Duplicates all accumulated state. The `Record` itself is cheap to
    /// clone (it's `Arc`-backed), so this is a shallow-data, deep-semantics
    /// copy: the returned context can be mutated freely without the
    /// original (or any sibling deep copy) observing the change.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deep_copy_is_isolated_from_source() {
        let ctx = InterpreterContext::from_record(Record::new(json!({"id": 1})));
        let mut copy = ctx.deep_copy();
        copy.set_variable("x", json!(1));
        copy.desired_ingest_mut().add_node(crate::value_objects::NodeIngest::new(
            crate::value_objects::NodeIdentity::new("Person", Default::default()),
        ));

        assert!(ctx.variable("x").is_none());
        assert!(ctx.desired_ingest().is_empty());
        assert_eq!(copy.variable("x").unwrap(), &json!(1));
        assert!(!copy.desired_ingest().is_empty());
    }
}
