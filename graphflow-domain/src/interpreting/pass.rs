// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Interpretation Passes
//!
//! `InterpretationPass` is the polymorphic interpretation tree: `Null`
//! (no-op), `SingleSequence` (in-place, ordered), `MultiSequence` (isolated
//! branches). `apply` is specified as "a lazy stream of context" in the
//! spec; here it returns an eagerly-collected `Vec<InterpreterContext>`
//! instead of a true lazy stream — see `DESIGN.md` for why that's a
//! faithful implementation of the same ordering guarantees without adding
//! a sync/async stream-adapter boundary the domain crate doesn't otherwise
//! cross (contexts are cheap, and every consumer of `apply` wants the full
//! result set immediately).
//!
//! The classmethod-style "from_file_arguments" factory the original system
//! uses to build a tree from declarative configuration is explicitly
//! configuration parsing (§9 design note) and has no place here.

use crate::interpreting::context::InterpreterContext;
use crate::interpreting::interpretation::Interpretation;
use crate::value_objects::IndexDescriptor;
use std::sync::Arc;

/// A node of the interpretation tree.
#[derive(Clone)]
pub enum InterpretationPass {
    /// Yields the input context unchanged.
    Null,
    /// Applies each interpretation in order, in place, to the same
    /// context, then yields that context once. Interpretations observe
    /// each other's effects.
    SingleSequence(Vec<Arc<dyn Interpretation>>),
    /// For each sub-pass, deep-copies the input context and applies the
    /// sub-pass to the copy, yielding every context the sub-pass produces.
    /// Sub-passes never observe each other's writes.
    MultiSequence(Vec<InterpretationPass>),
}

impl InterpretationPass {
    /// Applies this pass to `context`, yielding the resulting context(s) in
    /// deterministic order.
    pub fn apply(&self, context: InterpreterContext) -> Vec<InterpreterContext> {
        match self {
            InterpretationPass::Null => vec![context],
            InterpretationPass::SingleSequence(interpretations) => {
                let mut context = context;
                for interpretation in interpretations {
                    interpretation.interpret(&mut context);
                }
                vec![context]
            }
            InterpretationPass::MultiSequence(passes) => passes
                .iter()
                .flat_map(|pass| pass.apply(context.deep_copy()))
                .collect(),
        }
    }

    /// The subordinate passes/interpretations beneath this node — used for
    /// introspection (index gathering, schema description).
    pub fn subordinates(&self) -> Subordinates<'_> {
        match self {
            InterpretationPass::Null => Subordinates::None,
            InterpretationPass::SingleSequence(interpretations) => Subordinates::Interpretations(interpretations),
            InterpretationPass::MultiSequence(passes) => Subordinates::Passes(passes),
        }
    }

    /// Walks the tree and collects every index an interpretation beneath
    /// this node requires, in tree order.
    pub fn gather_used_indexes(&self) -> Vec<IndexDescriptor> {
        match self.subordinates() {
            Subordinates::None => Vec::new(),
            Subordinates::Interpretations(interpretations) => {
                interpretations.iter().flat_map(|i| i.required_indexes()).collect()
            }
            Subordinates::Passes(passes) => passes.iter().flat_map(InterpretationPass::gather_used_indexes).collect(),
        }
    }
}

/// The subordinate components exposed by one tree node, for introspection.
pub enum Subordinates<'a> {
    None,
    Interpretations(&'a [Arc<dyn Interpretation>]),
    Passes(&'a [InterpretationPass]),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreting::interpretation::SetVariableInterpretation;
    use crate::value_objects::Record;
    use serde_json::json;

    fn ctx() -> InterpreterContext {
        InterpreterContext::from_record(Record::new(json!({})))
    }

    #[test]
    fn null_pass_yields_context_unchanged() {
        let result = InterpretationPass::Null.apply(ctx());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn single_sequence_applies_in_order_with_shared_mutation() {
        let pass = InterpretationPass::SingleSequence(vec![
            Arc::new(SetVariableInterpretation::new("x", json!(1))),
            Arc::new(SetVariableInterpretation::new("x", json!(2))),
        ]);
        let result = pass.apply(ctx());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].variable("x").unwrap(), &json!(2));
    }

    #[test]
    fn multi_sequence_isolates_branches() {
        let pass = InterpretationPass::MultiSequence(vec![
            InterpretationPass::SingleSequence(vec![Arc::new(SetVariableInterpretation::new("x", json!(1)))]),
            InterpretationPass::SingleSequence(vec![Arc::new(SetVariableInterpretation::new("x", json!(2)))]),
        ]);
        let result = pass.apply(ctx());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].variable("x").unwrap(), &json!(1));
        assert_eq!(result[1].variable("x").unwrap(), &json!(2));
    }
}
