// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Interpreter
//!
//! The pure interpretation tree: global enrichment, a record decomposer,
//! and the main interpretation pass. `graphflow-core::interpreting`
//! adapts this to the `Transformer` port; everything here is synchronous
//! and I/O-free.

use crate::error::PipelineError;
use crate::interpreting::context::InterpreterContext;
use crate::interpreting::decomposer::RecordDecomposer;
use crate::interpreting::pass::InterpretationPass;
use crate::value_objects::{DesiredIngest, IndexDescriptor, Record};

/// The composed interpretation tree for one record type.
#[derive(Clone)]
pub struct Interpreter {
    /// Applied to the whole record before decomposition — enrichments that
    /// every sub-context should see (e.g. a variable derived from a
    /// record-level field, computed once rather than per decomposed
    /// element).
    global_enrichment: InterpretationPass,
    /// Splits the (possibly enriched) context into the sub-contexts the
    /// main pass runs over.
    iterate_on: RecordDecomposer,
    /// The main interpretation pass, applied to each sub-context.
    interpretations: InterpretationPass,
}

impl Interpreter {
    pub fn new(global_enrichment: InterpretationPass, iterate_on: RecordDecomposer, interpretations: InterpretationPass) -> Self {
        Self {
            global_enrichment,
            iterate_on,
            interpretations,
        }
    }

    /// All indexes the tree's interpretations require, in tree order
    /// (global enrichment's indexes first, then the main pass's).
    pub fn gather_used_indexes(&self) -> Vec<IndexDescriptor> {
        let mut indexes = self.global_enrichment.gather_used_indexes();
        indexes.extend(self.interpretations.gather_used_indexes());
        indexes
    }

    /// Builds a fresh context from `record`, enriches it, decomposes it,
    /// applies the main pass to each sub-context, and returns the
    /// resulting ingests in decomposition order, then interpretation order
    /// within each sub-context — the ordering contract spec §4.5 requires.
    pub fn interpret_record(&self, record: Record) -> Result<Vec<DesiredIngest>, PipelineError> {
        let base = InterpreterContext::from_record(record);
        let enriched = self.global_enrichment.apply(base);

        let mut ingests = Vec::new();
        for context in enriched {
            for sub_context in self.iterate_on.decompose(&context)? {
                for result in self.interpretations.apply(sub_context) {
                    ingests.push(result.into_desired_ingest());
                }
            }
        }
        Ok(ingests)
    }
}
