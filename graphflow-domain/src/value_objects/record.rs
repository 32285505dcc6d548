// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Record
//!
//! The opaque, source-agnostic value that flows through the pipeline.
//! Wraps a `serde_json::Value` so any extractor can hand the runtime a
//! structured-or-primitive payload without the core needing to know its
//! shape. Only the Interpreter ever looks inside one.

use serde_json::Value;
use std::sync::Arc;

/// A single unit of input flowing through the pipeline.
///
/// Cloning a `Record` is cheap: the payload is held behind an `Arc`, so a
/// `Record` can be duplicated across `InterpreterContext::deep_copy` calls
/// (one per `MultiSequence` branch, one per decomposed sub-context) without
/// re-copying the underlying JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Arc<Value>);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Reads a top-level field of the record, if it is a JSON object.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Builds a new `Record` whose payload is `value`, sharing nothing with
    /// `self` beyond the `Arc` machinery — used by the record decomposer to
    /// produce one sub-record per decomposed element.
    pub fn with_value(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
