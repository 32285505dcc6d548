// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Record Decomposer
//!
//! Produces sub-contexts from a parent context for "iterate-on" semantics:
//! one record can describe several graph entities (e.g. an order with a
//! line-items array, where each line item should become its own node).

use crate::error::PipelineError;
use crate::interpreting::context::InterpreterContext;
use crate::value_objects::Record;

/// Selects the sub-contexts an `Interpreter` applies its main pass to.
#[derive(Debug, Clone)]
pub enum RecordDecomposer {
    /// Yields the input context unchanged — no decomposition.
    Whole,
    /// Selects a JSON array field by name and yields one deep-copied
    /// sub-context per element, each with its record replaced by that
    /// element.
    IterateOn(String),
}

impl RecordDecomposer {
    /// Decomposes `context` into the sub-contexts the main interpretation
    /// pass should run over, in array order.
    pub fn decompose(&self, context: &InterpreterContext) -> Result<Vec<InterpreterContext>, PipelineError> {
        match self {
            RecordDecomposer::Whole => Ok(vec![context.deep_copy()]),
            RecordDecomposer::IterateOn(field) => {
                let elements = context
                    .record()
                    .field(field)
                    .and_then(|v| v.as_array())
                    .ok_or_else(|| {
                        PipelineError::InvalidDecomposition(format!(
                            "field `{field}` is absent or not an array on the source record"
                        ))
                    })?
                    .clone();

                Ok(elements
                    .into_iter()
                    .map(|element| {
                        let mut sub = context.deep_copy();
                        sub.set_record(Record::with_value(element));
                        sub
                    })
                    .collect())
            }
        }
    }
}
