// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Log-trigger dispatch.
//!
//! A log trigger is a boolean integer named `*_Log`. When its value goes
//! true, the strategy has staged a structured log: the companion
//! variables name the log type, the variables to read, and the field
//! names to report them under. One sweep assembles and delivers a
//! document per raised trigger, then resets the trigger.

use std::sync::Arc;

use tracing::{info, warn};

use paclink_core::{
    LogGroup, Scalar, StoreError, StoreResult, VarKind, VariableName, VariableStore,
    read_variable, scan,
};

use crate::sink::NotificationSink;

/// Log dispatch tuning.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Controller tag applied to every document.
    pub controller: String,
}

impl LogConfig {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
        }
    }
}

/// Sweeps raised log triggers for one controller.
pub struct LogDispatcher {
    store: Arc<dyn VariableStore>,
    sink: Arc<dyn NotificationSink>,
    config: LogConfig,
}

impl LogDispatcher {
    pub fn new(
        store: Arc<dyn VariableStore>,
        sink: Arc<dyn NotificationSink>,
        config: LogConfig,
    ) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Dispatch every raised trigger. Returns the number of documents
    /// delivered. A trigger whose companion variables cannot be read is
    /// skipped with a warning; the sweep continues.
    pub async fn process_logs(&self) -> StoreResult<usize> {
        let triggers = scan(self.store.as_ref(), &[VarKind::Int32], |v, summary| {
            v.is_log_trigger && summary.value.as_ref().is_some_and(Scalar::is_truthy)
        })
        .await?;

        let mut dispatched = 0;
        for hit in triggers {
            let Some(group) = hit.variable.log_group.clone() else {
                continue;
            };
            match self.dispatch(&hit.variable, &group).await {
                Ok(()) => dispatched += 1,
                Err(err) => {
                    warn!(trigger = %hit.variable.raw, %err, "log dispatch failed");
                }
            }
        }
        info!(dispatched, "log sweep finished");
        Ok(dispatched)
    }

    async fn dispatch(&self, trigger: &VariableName, group: &LogGroup) -> StoreResult<()> {
        let log_type = self
            .store
            .get_scalar(VarKind::String, &group.log_type_variable)
            .await?;
        let Scalar::Str(log_type) = log_type else {
            return Err(StoreError::UnexpectedResponse {
                name: group.log_type_variable.clone(),
                details: "log type is not a string".to_string(),
            });
        };
        let names = self
            .store
            .get_table(VarKind::StringTable, &group.variable_names_table)
            .await?;
        let fields = self
            .store
            .get_table(VarKind::StringTable, &group.field_names_table)
            .await?;

        let mut doc = serde_json::Map::new();
        doc.insert("type".to_string(), serde_json::Value::from(log_type));
        doc.insert(
            "controller".to_string(),
            serde_json::Value::from(self.config.controller.clone()),
        );
        for (name, field) in names.iter().zip(fields.iter()) {
            let (Scalar::Str(name), Scalar::Str(field)) = (name, field) else {
                continue;
            };
            let value =
                read_variable(self.store.as_ref(), &VariableName::parse(name.as_str())).await?;
            doc.insert(
                field.clone(),
                serde_json::to_value(&value).unwrap_or(serde_json::Value::Null),
            );
        }

        self.sink.deliver(&serde_json::Value::Object(doc)).await;

        // Reset the trigger so the strategy can raise it again.
        self.store
            .set_scalar(VarKind::Int32, &trigger.raw, Scalar::Int(0))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CollectingSink, MemoryStore};

    fn staged_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::default());
        store.insert_scalar(VarKind::Int32, "b_BatchComplete_Log", Scalar::Int(1));
        store.insert_scalar(VarKind::String, "s_BatchComplete_LogType", Scalar::Str("batch".into()));
        store.insert_table(
            VarKind::StringTable,
            "st_BatchComplete_Variables",
            vec![
                Scalar::Str("i_Cycle_Count".into()),
                Scalar::Str("f_Bath_Temp".into()),
            ],
        );
        store.insert_table(
            VarKind::StringTable,
            "st_BatchComplete_Fields",
            vec![Scalar::Str("cycles".into()), Scalar::Str("bath_temp".into())],
        );
        store.insert_scalar(VarKind::Int32, "i_Cycle_Count", Scalar::Int(17));
        store.insert_scalar(VarKind::Float, "f_Bath_Temp", Scalar::Float(140.5));
        store
    }

    #[tokio::test]
    async fn test_raised_trigger_dispatches_and_resets() {
        let store = staged_store();
        let sink = Arc::new(CollectingSink::default());
        let dispatcher = LogDispatcher::new(store.clone(), sink.clone(), LogConfig::new("line3"));

        let dispatched = dispatcher.process_logs().await.unwrap();
        assert_eq!(dispatched, 1);

        let docs = sink.docs();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["type"], "batch");
        assert_eq!(docs[0]["controller"], "line3");
        assert_eq!(docs[0]["cycles"], 17);
        assert_eq!(docs[0]["bath_temp"], 140.5);

        assert_eq!(
            store.scalar(VarKind::Int32, "b_BatchComplete_Log"),
            Some(Scalar::Int(0))
        );
    }

    #[tokio::test]
    async fn test_lowered_trigger_is_ignored() {
        let store = staged_store();
        store.insert_scalar(VarKind::Int32, "b_BatchComplete_Log", Scalar::Int(0));
        let sink = Arc::new(CollectingSink::default());
        let dispatcher = LogDispatcher::new(store.clone(), sink.clone(), LogConfig::new("line3"));

        let dispatched = dispatcher.process_logs().await.unwrap();
        assert_eq!(dispatched, 0);
        assert!(sink.docs().is_empty());
    }

    #[tokio::test]
    async fn test_missing_companions_skip_trigger_without_failing_sweep() {
        let store = Arc::new(MemoryStore::default());
        store.insert_scalar(VarKind::Int32, "b_Orphan_Log", Scalar::Int(1));
        let sink = Arc::new(CollectingSink::default());
        let dispatcher = LogDispatcher::new(store.clone(), sink.clone(), LogConfig::new("line3"));

        let dispatched = dispatcher.process_logs().await.unwrap();
        assert_eq!(dispatched, 0);
        assert!(sink.docs().is_empty());
        // The trigger stays raised so the problem is visible.
        assert_eq!(
            store.scalar(VarKind::Int32, "b_Orphan_Log"),
            Some(Scalar::Int(1))
        );
    }
}
