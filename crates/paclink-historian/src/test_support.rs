// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory fakes for the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use paclink_core::{Scalar, StoreError, StoreResult, VarKind, VarSummary, VariableStore};

use crate::sink::NotificationSink;

#[derive(Default)]
pub struct MemoryStore {
    scalars: Mutex<HashMap<(VarKind, String), Scalar>>,
    tables: Mutex<HashMap<(VarKind, String), Vec<Scalar>>>,
}

impl MemoryStore {
    pub fn insert_scalar(&self, kind: VarKind, name: &str, value: Scalar) {
        self.scalars
            .lock()
            .unwrap()
            .insert((kind, name.to_string()), value);
    }

    pub fn insert_table(&self, kind: VarKind, name: &str, values: Vec<Scalar>) {
        self.tables
            .lock()
            .unwrap()
            .insert((kind, name.to_string()), values);
    }

    pub fn scalar(&self, kind: VarKind, name: &str) -> Option<Scalar> {
        self.scalars
            .lock()
            .unwrap()
            .get(&(kind, name.to_string()))
            .cloned()
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn get_scalar(&self, kind: VarKind, name: &str) -> StoreResult<Scalar> {
        self.scalar(kind, name)
            .ok_or_else(|| StoreError::NotFound { name: name.into() })
    }

    async fn get_table(&self, kind: VarKind, name: &str) -> StoreResult<Vec<Scalar>> {
        self.tables
            .lock()
            .unwrap()
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound { name: name.into() })
    }

    async fn set_scalar(&self, kind: VarKind, name: &str, value: Scalar) -> StoreResult<()> {
        self.insert_scalar(kind, name, value);
        Ok(())
    }

    async fn set_table(
        &self,
        kind: VarKind,
        name: &str,
        values: &[Scalar],
        _start_index: usize,
    ) -> StoreResult<()> {
        self.insert_table(kind, name, values.to_vec());
        Ok(())
    }

    async fn list_all(&self, kind: VarKind) -> StoreResult<Vec<VarSummary>> {
        let mut summaries: Vec<VarSummary> = self
            .scalars
            .lock()
            .unwrap()
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|((_, name), value)| VarSummary {
                name: name.clone(),
                value: Some(value.clone()),
                length: None,
            })
            .collect();
        summaries.extend(
            self.tables
                .lock()
                .unwrap()
                .iter()
                .filter(|((k, _), _)| *k == kind)
                .map(|((_, name), values)| VarSummary {
                    name: name.clone(),
                    value: None,
                    length: Some(values.len()),
                }),
        );
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }
}

/// Sink that keeps every delivered document.
#[derive(Default)]
pub struct CollectingSink {
    docs: Mutex<Vec<serde_json::Value>>,
}

impl CollectingSink {
    pub fn docs(&self) -> Vec<serde_json::Value> {
        self.docs.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for CollectingSink {
    async fn deliver(&self, doc: &serde_json::Value) {
        self.docs.lock().unwrap().push(doc.clone());
    }
}
