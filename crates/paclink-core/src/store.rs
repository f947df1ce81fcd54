// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The variable store seam.
//!
//! Everything paclink does against a controller goes through
//! [`VariableStore`]: typed read/write/list operations keyed by variable
//! kind and name. The production implementation lives in `paclink-client`;
//! tests use in-memory fakes. Store implementations are coercion-free;
//! boolean semantics are applied by callers via the classification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::value::{Scalar, VarValue};
use crate::variable::{VarKind, VariableName};

/// One entry of a per-kind listing.
///
/// Scalar listings carry the value inline; table listings are summaries
/// carrying the element count instead. The `length` field never leaves
/// this type; scan results resolve summaries into full values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

/// Typed access to a controller's strategy variables.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Read one scalar variable.
    async fn get_scalar(&self, kind: VarKind, name: &str) -> StoreResult<Scalar>;

    /// Read a table variable in full, preserving element order.
    async fn get_table(&self, kind: VarKind, name: &str) -> StoreResult<Vec<Scalar>>;

    /// Write one scalar variable.
    async fn set_scalar(&self, kind: VarKind, name: &str, value: Scalar) -> StoreResult<()>;

    /// Bulk-write table elements starting at `start_index`.
    async fn set_table(
        &self,
        kind: VarKind,
        name: &str,
        values: &[Scalar],
        start_index: usize,
    ) -> StoreResult<()>;

    /// List every variable of one kind.
    async fn list_all(&self, kind: VarKind) -> StoreResult<Vec<VarSummary>>;
}

/// Read a variable by its classified kind, scalar or table, applying
/// boolean semantics for boolean-classified integers.
pub async fn read_variable(
    store: &dyn VariableStore,
    variable: &VariableName,
) -> StoreResult<VarValue> {
    let Some(kind) = variable.kind else {
        return Err(StoreError::InvalidName {
            name: variable.raw.clone(),
        });
    };
    let value = if kind.is_table() {
        VarValue::Table(store.get_table(kind, &variable.raw).await?)
    } else {
        VarValue::Scalar(store.get_scalar(kind, &variable.raw).await?)
    };
    Ok(value.with_boolean_semantics(variable))
}

/// Write a variable by its classified kind. Boolean values are coerced to
/// the store's 1/0 form first; tables are written from index 0. Inputs and
/// timers are rejected as not writable.
pub async fn write_variable(
    store: &dyn VariableStore,
    variable: &VariableName,
    value: VarValue,
) -> StoreResult<()> {
    let Some(kind) = variable.kind else {
        return Err(StoreError::InvalidName {
            name: variable.raw.clone(),
        });
    };
    if matches!(
        kind,
        VarKind::AnalogInput | VarKind::DigitalInput | VarKind::UpTimer | VarKind::DownTimer
    ) {
        return Err(StoreError::NotWritable {
            name: variable.raw.clone(),
        });
    }
    match value.with_store_semantics(variable) {
        VarValue::Scalar(scalar) if !kind.is_table() => {
            store.set_scalar(kind, &variable.raw, scalar).await
        }
        VarValue::Table(values) if kind.is_table() => {
            store.set_table(kind, &variable.raw, &values, 0).await
        }
        _ => Err(StoreError::UnexpectedResponse {
            name: variable.raw.clone(),
            details: format!("value shape does not match kind '{kind}'"),
        }),
    }
}
