// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Classify-filter-resolve scans over the variable store.
//!
//! Historian export, log-trigger discovery, and regex search all share one
//! shape: list variables of some kinds, classify every name, keep the
//! entries a predicate accepts, and resolve full values for entries whose
//! listing was only a summary. The returned values are uniform
//! scalar-or-sequence shapes; the transport summary metadata is stripped.

use regex::Regex;
use tracing::debug;

use crate::error::StoreResult;
use crate::store::{VarSummary, VariableStore};
use crate::value::VarValue;
use crate::variable::{VarKind, VariableName};

/// One scan match: the classified name and its resolved value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit {
    pub variable: VariableName,
    pub value: VarValue,
}

/// Scan the given kinds, keeping entries whose classification and listing
/// entry satisfy `predicate`.
///
/// Entries without an inline value (table summaries) are resolved with a
/// second read keyed by the kind they were listed under. Boolean-classified
/// integers come back as `true`/`false`.
pub async fn scan<F>(
    store: &dyn VariableStore,
    kinds: &[VarKind],
    predicate: F,
) -> StoreResult<Vec<ScanHit>>
where
    F: Fn(&VariableName, &VarSummary) -> bool,
{
    let mut hits = Vec::new();
    for &kind in kinds {
        let summaries = store.list_all(kind).await?;
        debug!(kind = %kind, count = summaries.len(), "scanning listing");
        for summary in summaries {
            let variable = VariableName::parse(summary.name.clone());
            if !predicate(&variable, &summary) {
                continue;
            }
            let value = match summary.value {
                Some(scalar) => VarValue::Scalar(scalar),
                None if kind.is_table() => {
                    VarValue::Table(store.get_table(kind, &summary.name).await?)
                }
                None => VarValue::Scalar(store.get_scalar(kind, &summary.name).await?),
            };
            let value = value.with_boolean_semantics(&variable);
            hits.push(ScanHit { variable, value });
        }
    }
    Ok(hits)
}

/// Regex search over one kind's variable names.
pub async fn find_matching(
    store: &dyn VariableStore,
    kind: VarKind,
    pattern: &Regex,
) -> StoreResult<Vec<ScanHit>> {
    scan(store, &[kind], |variable, _| pattern.is_match(&variable.raw)).await
}
