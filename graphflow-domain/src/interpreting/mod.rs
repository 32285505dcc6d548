// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The interpretation tree: `InterpreterContext`, `RecordDecomposer`,
//! `Interpretation`/`InterpretationPass`, and the composed `Interpreter`.

pub mod context;
pub mod decomposer;
pub mod interpretation;
pub mod interpreter;
pub mod pass;

pub use context::InterpreterContext;
pub use decomposer::RecordDecomposer;
pub use interpretation::{
    CreateNodeInterpretation, CreateRelationshipInterpretation, Interpretation, SetPropertyInterpretation,
    SetVariableInterpretation,
};
pub use interpreter::Interpreter;
pub use pass::{InterpretationPass, Subordinates};
