// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Variable values as they cross the store and backup boundaries.
//!
//! Values are always a bare scalar or a bare ordered sequence; the
//! transport-specific summary shape (name/length envelopes) never leaks
//! past the store seam. Boolean coercion between `true`/`false` and the
//! controller's 1/0 integers is performed by store *callers* using the
//! name classification, never by a store implementation.

use serde::{Deserialize, Serialize};

use crate::variable::VariableName;

/// A single controller value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Truthiness as the controller sees it: nonzero, nonempty, or `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Str(s) => !s.is_empty(),
        }
    }

    /// Replace a boolean with its 1/0 integer store form.
    pub fn into_store_form(self) -> Scalar {
        match self {
            Scalar::Bool(b) => Scalar::Int(i64::from(b)),
            other => other,
        }
    }

    /// Replace an integer with its boolean reading (nonzero is true).
    pub fn into_boolean_form(self) -> Scalar {
        match self {
            Scalar::Int(i) => Scalar::Bool(i != 0),
            other => other,
        }
    }
}

/// A scalar or an ordered sequence, matching the variable's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Scalar(Scalar),
    Table(Vec<Scalar>),
}

impl VarValue {
    /// Apply boolean semantics for boolean-classified integer variables:
    /// integers read from the store become `true`/`false`. Other
    /// classifications pass through unchanged.
    pub fn with_boolean_semantics(self, variable: &VariableName) -> Self {
        if !variable.is_boolean {
            return self;
        }
        match self {
            VarValue::Scalar(s) => VarValue::Scalar(s.into_boolean_form()),
            VarValue::Table(t) => {
                VarValue::Table(t.into_iter().map(Scalar::into_boolean_form).collect())
            }
        }
    }

    /// Undo boolean semantics before handing a value to the store:
    /// `true`/`false` become 1/0 for boolean-classified integer variables.
    pub fn with_store_semantics(self, variable: &VariableName) -> Self {
        if !variable.is_boolean {
            return self;
        }
        match self {
            VarValue::Scalar(s) => VarValue::Scalar(s.into_store_form()),
            VarValue::Table(t) => {
                VarValue::Table(t.into_iter().map(Scalar::into_store_form).collect())
            }
        }
    }
}

impl From<Scalar> for VarValue {
    fn from(value: Scalar) -> Self {
        VarValue::Scalar(value)
    }
}

impl From<Vec<Scalar>> for VarValue {
    fn from(values: Vec<Scalar>) -> Self {
        VarValue::Table(values)
    }
}
