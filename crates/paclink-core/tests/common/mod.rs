// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory fakes shared by the integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use paclink_core::{
    BackupError, BackupRecord, RecipeFileStore, Scalar, StoreError, StoreResult, VarKind,
    VarSummary, VariableStore,
};

/// Variable store fake holding scalars and tables keyed by kind and name.
/// Every operation is appended to `ops` so tests can assert ordering.
#[derive(Default)]
pub struct MemoryStore {
    scalars: Mutex<HashMap<(VarKind, String), Scalar>>,
    tables: Mutex<HashMap<(VarKind, String), Vec<Scalar>>>,
    ops: Mutex<Vec<String>>,
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

    pub fn table(&self, kind: VarKind, name: &str) -> Option<Vec<Scalar>> {
        self.tables
            .lock()
            .unwrap()
            .get(&(kind, name.to_string()))
            .cloned()
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    fn record(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn get_scalar(&self, kind: VarKind, name: &str) -> StoreResult<Scalar> {
        self.record(format!("get_scalar {kind} {name}"));
        self.scalar(kind, name)
            .ok_or_else(|| StoreError::NotFound { name: name.into() })
    }

    async fn get_table(&self, kind: VarKind, name: &str) -> StoreResult<Vec<Scalar>> {
        self.record(format!("get_table {kind} {name}"));
        self.table(kind, name)
            .ok_or_else(|| StoreError::NotFound { name: name.into() })
    }

    async fn set_scalar(&self, kind: VarKind, name: &str, value: Scalar) -> StoreResult<()> {
        self.record(format!("set_scalar {kind} {name}"));
        self.insert_scalar(kind, name, value);
        Ok(())
    }

    async fn set_table(
        &self,
        kind: VarKind,
        name: &str,
        values: &[Scalar],
        start_index: usize,
    ) -> StoreResult<()> {
        self.record(format!("set_table {kind} {name} @{start_index}"));
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry((kind, name.to_string())).or_default();
        if table.len() < start_index + values.len() {
            table.resize(start_index + values.len(), Scalar::Int(0));
        }
        table[start_index..start_index + values.len()].clone_from_slice(values);
        Ok(())
    }

    async fn list_all(&self, kind: VarKind) -> StoreResult<Vec<VarSummary>> {
        self.record(format!("list_all {kind}"));
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

/// Backup backend fake storing rendered documents, so tests can inject
/// corrupt content directly.
#[derive(Default)]
pub struct MemoryFileStore {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryFileStore {
    pub fn insert_document(&self, key: &str, document: &str) {
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), document.to_string());
    }

    pub fn document(&self, key: &str) -> Option<String> {
        self.documents.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }
}

#[async_trait]
impl RecipeFileStore for MemoryFileStore {
    async fn write_record(&self, key: &str, record: &BackupRecord) -> Result<(), BackupError> {
        self.insert_document(key, &record.to_document());
        Ok(())
    }

    async fn read_record(
        &self,
        key: &str,
        name: &str,
    ) -> Result<Option<BackupRecord>, BackupError> {
        match self.document(key) {
            Some(document) => BackupRecord::parse(key, name, &document).map(Some),
            None => Ok(None),
        }
    }
}
