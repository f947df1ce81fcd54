// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Batch export of historian-classified variables.
//!
//! One `historize()` call scans every historizable kind, turns each
//! historian-classified variable into a measurement point, and delivers
//! the batch to the sink. Scalars become one point each; tables are read
//! in full and emit one point per element with its index. Booleans are
//! recorded as 0/1 so the series stays numeric.

use std::sync::Arc;

use tracing::info;

use paclink_core::{Scalar, StoreResult, VarKind, VarValue, VariableStore, scan};

use crate::sink::NotificationSink;

/// Flag raised after a batch was delivered, so the strategy can watch the
/// export heartbeat.
pub const HISTORIZED_FLAG: &str = "b_Historized";

/// Scalar kinds checked for historian eligibility. I/O points are always
/// eligible; the rest need the historian marker.
const SCALAR_KINDS: [VarKind; 8] = [
    VarKind::AnalogInput,
    VarKind::AnalogOutput,
    VarKind::DigitalInput,
    VarKind::DigitalOutput,
    VarKind::Int32,
    VarKind::Float,
    VarKind::UpTimer,
    VarKind::DownTimer,
];

/// Numeric table kinds checked for historian eligibility.
const TABLE_KINDS: [VarKind; 2] = [VarKind::Int32Table, VarKind::FloatTable];

/// Historian tuning.
#[derive(Debug, Clone)]
pub struct HistorianConfig {
    /// Controller tag applied to every point.
    pub controller: String,
    /// Measurement name for scalar points.
    pub variable_measurement: String,
    /// Measurement name for table-element points.
    pub table_measurement: String,
}

impl HistorianConfig {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            variable_measurement: "variables".to_string(),
            table_measurement: "tables".to_string(),
        }
    }
}

/// Exports historian-classified variables for one controller.
pub struct Historian {
    store: Arc<dyn VariableStore>,
    sink: Arc<dyn NotificationSink>,
    config: HistorianConfig,
}

impl Historian {
    pub fn new(
        store: Arc<dyn VariableStore>,
        sink: Arc<dyn NotificationSink>,
        config: HistorianConfig,
    ) -> Self {
        Self {
            store,
            sink,
            config,
        }
    }

    /// Scan, assemble the point batch, and deliver it. Returns the number
    /// of points in the batch. An empty batch is not delivered and does
    /// not touch the heartbeat flag.
    pub async fn historize(&self) -> StoreResult<usize> {
        let mut points = Vec::new();

        for hit in scan(self.store.as_ref(), &SCALAR_KINDS, |v, _| v.is_historian).await? {
            if let VarValue::Scalar(value) = hit.value {
                points.push(self.variable_point(&hit.variable.raw, value));
            }
        }

        for hit in scan(self.store.as_ref(), &TABLE_KINDS, |v, _| v.is_historian).await? {
            if let VarValue::Table(values) = hit.value {
                for (index, value) in values.into_iter().enumerate() {
                    points.push(self.table_point(&hit.variable.raw, index, value));
                }
            }
        }

        let count = points.len();
        if count > 0 {
            self.sink.deliver(&serde_json::Value::Array(points)).await;
            self.store
                .set_scalar(VarKind::Int32, HISTORIZED_FLAG, Scalar::Int(1))
                .await?;
        }
        info!(points = count, "historian batch finished");
        Ok(count)
    }

    fn variable_point(&self, name: &str, value: Scalar) -> serde_json::Value {
        serde_json::json!({
            "measurement": self.config.variable_measurement,
            "tags": { "name": name, "controller": self.config.controller },
            "fields": { "value": field_value(value) },
        })
    }

    fn table_point(&self, name: &str, index: usize, value: Scalar) -> serde_json::Value {
        serde_json::json!({
            "measurement": self.config.table_measurement,
            "tags": { "name": name, "controller": self.config.controller },
            "fields": { "index": index, "value": field_value(value) },
        })
    }
}

/// Point field values stay numeric: booleans are recorded as 0/1.
fn field_value(value: Scalar) -> serde_json::Value {
    match value.into_store_form() {
        Scalar::Int(i) => serde_json::Value::from(i),
        Scalar::Float(f) => serde_json::Value::from(f),
        Scalar::Bool(b) => serde_json::Value::from(i64::from(b)),
        Scalar::Str(s) => serde_json::Value::from(s),
    }
}
