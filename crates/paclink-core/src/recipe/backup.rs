// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Backup records and the file backend behind them.
//!
//! Each recipe variable persists as one record keyed by the classifier's
//! `recipe_key`: a single-entry JSON mapping from the variable name to its
//! last-saved value, newline terminated. Records are created or
//! overwritten on save and read on restore; nothing here ever deletes one.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::BackupError;
use crate::value::VarValue;

/// One recipe variable's persisted value.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupRecord {
    pub name: String,
    pub value: VarValue,
}

impl BackupRecord {
    /// Render the single-entry document, newline terminated.
    pub fn to_document(&self) -> String {
        let mut map = serde_json::Map::new();
        map.insert(
            self.name.clone(),
            serde_json::to_value(&self.value).unwrap_or(serde_json::Value::Null),
        );
        let mut doc = serde_json::Value::Object(map).to_string();
        doc.push('\n');
        doc
    }

    /// Parse a document, looking up the entry for `name`.
    ///
    /// Any shape problem (invalid JSON, a non-object document, no entry
    /// under the expected name) is a corrupt record, which is fatal for
    /// the enclosing pass. Missing files never reach this function.
    pub fn parse(key: &str, name: &str, document: &str) -> Result<Self, BackupError> {
        let entries: HashMap<String, VarValue> =
            serde_json::from_str(document).map_err(|err| BackupError::Corrupt {
                key: key.to_string(),
                details: err.to_string(),
            })?;
        let value = entries
            .get(name)
            .cloned()
            .ok_or_else(|| BackupError::Corrupt {
                key: key.to_string(),
                details: format!("no entry for variable '{name}'"),
            })?;
        Ok(Self {
            name: name.to_string(),
            value,
        })
    }
}

/// Storage backend for backup records.
#[async_trait]
pub trait RecipeFileStore: Send + Sync {
    /// Create or overwrite the record under `key`.
    async fn write_record(&self, key: &str, record: &BackupRecord) -> Result<(), BackupError>;

    /// Read the record under `key`, expecting the entry for `name`.
    /// `Ok(None)` means the record does not exist, an expected condition
    /// the restore pass reports in bulk.
    async fn read_record(&self, key: &str, name: &str)
    -> Result<Option<BackupRecord>, BackupError>;
}

/// Filesystem backend: one file per record under a base directory.
#[derive(Debug, Clone)]
pub struct FsRecipeFileStore {
    dir: PathBuf,
}

impl FsRecipeFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys come from the classifier, so they are a valid variable name
        // plus an extension; no traversal components can appear.
        self.dir.join(key)
    }
}

#[async_trait]
impl RecipeFileStore for FsRecipeFileStore {
    async fn write_record(&self, key: &str, record: &BackupRecord) -> Result<(), BackupError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| BackupError::Io {
                key: key.to_string(),
                details: err.to_string(),
            })?;
        fs::write(self.path_for(key), record.to_document())
            .await
            .map_err(|err| BackupError::Io {
                key: key.to_string(),
                details: err.to_string(),
            })
    }

    async fn read_record(
        &self,
        key: &str,
        name: &str,
    ) -> Result<Option<BackupRecord>, BackupError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(document) => BackupRecord::parse(key, name, &document).map(Some),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(BackupError::Io {
                key: key.to_string(),
                details: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn test_document_shape() {
        let record = BackupRecord {
            name: "rf_Bath_Temp".into(),
            value: VarValue::Scalar(Scalar::Float(140.5)),
        };
        assert_eq!(record.to_document(), "{\"rf_Bath_Temp\":140.5}\n");
    }

    #[test]
    fn test_parse_roundtrip() {
        let record = BackupRecord {
            name: "rst_Part_Numbers".into(),
            value: VarValue::Table(vec![Scalar::Str("A1".into()), Scalar::Str("B2".into())]),
        };
        let parsed = BackupRecord::parse(
            "rst_Part_Numbers.json",
            "rst_Part_Numbers",
            &record.to_document(),
        )
        .unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = BackupRecord::parse("k.json", "k", "{not json").unwrap_err();
        assert!(matches!(err, BackupError::Corrupt { .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_key() {
        let err =
            BackupRecord::parse("rb_A_B.json", "rb_A_B", "{\"rb_Other_Name\": 1}\n").unwrap_err();
        assert!(matches!(err, BackupError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_fs_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsRecipeFileStore::new(dir.path());
        let record = BackupRecord {
            name: "ri_Dwell_Seconds".into(),
            value: VarValue::Scalar(Scalar::Int(30)),
        };

        store
            .write_record("ri_Dwell_Seconds.json", &record)
            .await
            .unwrap();
        let read = store
            .read_record("ri_Dwell_Seconds.json", "ri_Dwell_Seconds")
            .await
            .unwrap();
        assert_eq!(read, Some(record));

        let document = std::fs::read_to_string(dir.path().join("ri_Dwell_Seconds.json")).unwrap();
        assert!(document.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_fs_store_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsRecipeFileStore::new(dir.path());
        let read = store.read_record("rb_Nope.json", "rb_Nope").await.unwrap();
        assert_eq!(read, None);
    }

    #[tokio::test]
    async fn test_fs_store_corrupt_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rb_Bad.json"), "][").unwrap();
        let store = FsRecipeFileStore::new(dir.path());
        let err = store.read_record("rb_Bad.json", "rb_Bad").await.unwrap_err();
        assert!(matches!(err, BackupError::Corrupt { .. }));
    }
}
