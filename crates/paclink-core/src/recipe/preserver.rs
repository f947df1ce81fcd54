// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The recipe preservation state machine.
//!
//! `process()` reads the status variable and runs at most one pass:
//!
//! - `SaveNeeded`: snapshot every recipe-classified variable of the six
//!   persistable kinds to backup records, then `SaveFinished`.
//! - `RestoreNeededAfterDownload`: write backup values into the store;
//!   variables without a record accumulate into a missing list that is
//!   reported through the error channel, in which case the status stays
//!   pending so the next trigger retries. A clean restore advances to
//!   `SaveNeeded`.
//! - anything else: no-op.
//!
//! Status read happens-before all variable I/O happens-before the final
//! status write. Concurrent `process()` calls against one controller are
//! not serialized here; the trigger scheduler must deliver at most one at
//! a time.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{BackupError, PreserveError, StoreError};
use crate::recipe::backup::{BackupRecord, RecipeFileStore};
use crate::recipe::status::{
    MISSING_VARIABLES_FLAG, MISSING_VARIABLES_TABLE, RecipeStatus, STATUS_VARIABLE,
};
use crate::store::VariableStore;
use crate::value::{Scalar, VarValue};
use crate::variable::{PERSISTABLE_KINDS, VarKind, VariableName};

/// Durability of save-pass backup writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteDurability {
    /// Detach writes onto the runtime; failures are logged. Matches the
    /// controller deployments where the save trigger must return quickly.
    #[default]
    Background,
    /// Await every write before advancing the status.
    Synchronous,
}

/// Preserver tuning.
#[derive(Debug, Clone, Default)]
pub struct PreserverConfig {
    pub durability: WriteDurability,
}

/// What a `process()` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Save pass ran; `written` backup records were issued.
    Saved { written: usize },
    /// Restore pass ran. `missing` holds names without a backup record;
    /// when non-empty the status was left pending and the error channel
    /// raised.
    Restored { restored: usize, missing: Vec<String> },
    /// Status required no work. Carries the decoded status, or `None` for
    /// a raw value outside the contract.
    Idle { status: Option<RecipeStatus> },
}

/// Drives recipe save/restore for one controller.
pub struct RecipePreserver {
    store: Arc<dyn VariableStore>,
    files: Arc<dyn RecipeFileStore>,
    config: PreserverConfig,
}

impl RecipePreserver {
    pub fn new(store: Arc<dyn VariableStore>, files: Arc<dyn RecipeFileStore>) -> Self {
        Self {
            store,
            files,
            config: PreserverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PreserverConfig) -> Self {
        self.config = config;
        self
    }

    /// Read the status variable and run the pass it calls for.
    pub async fn process(&self) -> Result<ProcessOutcome, PreserveError> {
        let raw = self
            .store
            .get_scalar(VarKind::Int32, STATUS_VARIABLE)
            .await?;
        let status = match raw {
            Scalar::Int(value) => RecipeStatus::from_raw(value),
            other => {
                warn!(?other, "status variable held a non-integer value");
                None
            }
        };

        match status {
            Some(RecipeStatus::SaveNeeded) => self.save_all().await,
            Some(RecipeStatus::RestoreNeededAfterDownload) => self.restore_all().await,
            other => {
                debug!(status = ?other, "no recipe work pending");
                Ok(ProcessOutcome::Idle { status: other })
            }
        }
    }

    async fn set_status(&self, status: RecipeStatus) -> Result<(), StoreError> {
        self.store
            .set_scalar(VarKind::Int32, STATUS_VARIABLE, Scalar::Int(status.as_raw()))
            .await
    }

    async fn save_all(&self) -> Result<ProcessOutcome, PreserveError> {
        self.set_status(RecipeStatus::SaveInProgress).await?;
        let mut written = 0;
        for kind in PERSISTABLE_KINDS {
            written += self.save_kind(kind).await?;
        }
        self.set_status(RecipeStatus::SaveFinished).await?;
        info!(written, "recipe save pass finished");
        Ok(ProcessOutcome::Saved { written })
    }

    async fn save_kind(&self, kind: VarKind) -> Result<usize, PreserveError> {
        let mut written = 0;
        for summary in self.store.list_all(kind).await? {
            let variable = VariableName::parse(summary.name.clone());
            let Some(key) = variable.recipe_key.clone() else {
                continue;
            };

            // Table listings are summaries; the snapshot needs the full
            // current value.
            let value = if kind.is_table() {
                VarValue::Table(self.store.get_table(kind, &summary.name).await?)
            } else {
                match summary.value {
                    Some(scalar) => VarValue::Scalar(scalar),
                    None => VarValue::Scalar(self.store.get_scalar(kind, &summary.name).await?),
                }
            };
            let record = BackupRecord {
                name: summary.name.clone(),
                value: value.with_boolean_semantics(&variable),
            };

            match self.config.durability {
                WriteDurability::Synchronous => self.files.write_record(&key, &record).await?,
                WriteDurability::Background => {
                    let files = Arc::clone(&self.files);
                    tokio::spawn(async move {
                        if let Err(err) = files.write_record(&key, &record).await {
                            warn!(%err, "background backup write failed");
                        }
                    });
                }
            }
            written += 1;
        }
        debug!(kind = %kind, written, "saved recipe variables");
        Ok(written)
    }

    async fn restore_all(&self) -> Result<ProcessOutcome, PreserveError> {
        self.set_status(RecipeStatus::RestoreInProgress).await?;
        let mut restored = 0;
        let mut missing = Vec::new();
        for kind in PERSISTABLE_KINDS {
            restored += self.restore_kind(kind, &mut missing).await?;
        }

        if missing.is_empty() {
            self.set_status(RecipeStatus::SaveNeeded).await?;
            info!(restored, "recipe restore pass finished");
        } else {
            // Surface the partial restore to the operator and leave the
            // status pending so the next trigger can retry once the
            // records exist.
            warn!(restored, missing = missing.len(), "restore pass left variables unrestored");
            let names: Vec<Scalar> = missing.iter().cloned().map(Scalar::Str).collect();
            self.store
                .set_table(VarKind::StringTable, MISSING_VARIABLES_TABLE, &names, 0)
                .await?;
            self.store
                .set_scalar(VarKind::Int32, MISSING_VARIABLES_FLAG, Scalar::Int(1))
                .await?;
        }
        Ok(ProcessOutcome::Restored { restored, missing })
    }

    async fn restore_kind(
        &self,
        kind: VarKind,
        missing: &mut Vec<String>,
    ) -> Result<usize, PreserveError> {
        let mut restored = 0;
        for summary in self.store.list_all(kind).await? {
            let variable = VariableName::parse(summary.name.clone());
            let Some(key) = variable.recipe_key.as_deref() else {
                continue;
            };

            let Some(record) = self.files.read_record(key, &summary.name).await? else {
                missing.push(summary.name.clone());
                continue;
            };

            match record.value.with_store_semantics(&variable) {
                VarValue::Scalar(scalar) if !kind.is_table() => {
                    self.store.set_scalar(kind, &summary.name, scalar).await?;
                }
                VarValue::Table(values) if kind.is_table() => {
                    self.store
                        .set_table(kind, &summary.name, &values, 0)
                        .await?;
                }
                _ => {
                    // A scalar record for a table variable (or vice versa)
                    // is malformed content, not a missing backup.
                    return Err(PreserveError::Backup(BackupError::Corrupt {
                        key: key.to_string(),
                        details: format!("value shape does not match kind '{kind}'"),
                    }));
                }
            }
            restored += 1;
        }
        debug!(kind = %kind, restored, "restored recipe variables");
        Ok(restored)
    }
}
