// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP client for the PAC Control REST API.
//!
//! Implements the [`VariableStore`] seam over the controller's REST
//! endpoints: scalar variables and timers under `vars/`, physical I/O
//! under `ios/`, tables under `tables/`. Scalar reads unwrap the
//! `{"value": ...}` envelope; writes check the strategy's `errorCode`.
//! The store impl is coercion-free; boolean semantics live in the
//! classification-aware helpers of paclink-core.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use paclink_core::{
    Scalar, StoreResult, VarKind, VarSummary, VarValue, VariableName, VariableStore,
    read_variable, write_variable,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Scalar read/write envelope.
#[derive(Debug, Deserialize)]
struct ValueEnvelope {
    value: Scalar,
}

/// Write acknowledgement envelope.
#[derive(Debug, Deserialize)]
struct ErrorCodeEnvelope {
    #[serde(rename = "errorCode")]
    error_code: i64,
}

/// Client for one controller's PAC Control REST API.
pub struct PacClient {
    http: reqwest::Client,
    base_url: String,
    config: ClientConfig,
}

impl PacClient {
    /// Create a client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::Config(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url(),
            config,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "controller GET");
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header("apiKey", &self.config.api_key)
            .header("accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                path: path.to_string(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        response.json().await.map_err(|err| ClientError::Decode {
            path: path.to_string(),
            details: err.to_string(),
        })
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<()> {
        debug!(path, "controller POST");
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .query(query)
            .header("apiKey", &self.config.api_key)
            .header("accept", "application/json")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                path: path.to_string(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let ack: ErrorCodeEnvelope =
            response.json().await.map_err(|err| ClientError::Decode {
                path: path.to_string(),
                details: err.to_string(),
            })?;
        if ack.error_code != 0 {
            return Err(ClientError::Strategy {
                code: ack.error_code,
                path: path.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Device information
    // =========================================================================

    /// Controller device details.
    pub async fn device(&self) -> Result<serde_json::Value> {
        self.get_json("/device").await
    }

    /// Running strategy details.
    pub async fn strategy(&self) -> Result<serde_json::Value> {
        self.get_json("/device/strategy").await
    }

    // =========================================================================
    // Name-dispatched access
    // =========================================================================

    /// Read any variable by name, dispatching on the classified kind and
    /// applying boolean semantics.
    pub async fn get_variable(&self, name: &str) -> StoreResult<VarValue> {
        read_variable(self, &VariableName::parse(name)).await
    }

    /// Write any variable by name, dispatching on the classified kind.
    pub async fn set_variable(&self, name: &str, value: VarValue) -> StoreResult<()> {
        write_variable(self, &VariableName::parse(name), value).await
    }
}

/// Collection endpoint for one kind.
fn list_path(kind: VarKind) -> &'static str {
    match kind {
        VarKind::AnalogInput => "/device/strategy/ios/analogInputs",
        VarKind::AnalogOutput => "/device/strategy/ios/analogOutputs",
        VarKind::DigitalInput => "/device/strategy/ios/digitalInputs",
        VarKind::DigitalOutput => "/device/strategy/ios/digitalOutputs",
        VarKind::Int32 => "/device/strategy/vars/int32s",
        VarKind::Float => "/device/strategy/vars/floats",
        VarKind::String => "/device/strategy/vars/strings",
        VarKind::UpTimer => "/device/strategy/vars/upTimers",
        VarKind::DownTimer => "/device/strategy/vars/downTimers",
        VarKind::Int32Table => "/device/strategy/tables/int32s",
        VarKind::FloatTable => "/device/strategy/tables/floats",
        VarKind::StringTable => "/device/strategy/tables/strings",
    }
}

/// Scalar read endpoint. I/O points read engineering units or state;
/// timers read their current value.
fn read_path(kind: VarKind, name: &str) -> String {
    let name = urlencoding::encode(name);
    match kind {
        VarKind::AnalogInput | VarKind::AnalogOutput => format!("{}/{name}/eu", list_path(kind)),
        VarKind::DigitalInput | VarKind::DigitalOutput => {
            format!("{}/{name}/state", list_path(kind))
        }
        VarKind::UpTimer | VarKind::DownTimer => format!("{}/{name}/value", list_path(kind)),
        _ => format!("{}/{name}", list_path(kind)),
    }
}

/// Scalar write endpoint; `None` for read-only kinds.
fn write_path(kind: VarKind, name: &str) -> Option<String> {
    let encoded = urlencoding::encode(name);
    match kind {
        VarKind::AnalogOutput => Some(format!("{}/{encoded}/eu", list_path(kind))),
        VarKind::DigitalOutput => Some(format!("{}/{encoded}/state", list_path(kind))),
        VarKind::Int32 | VarKind::Float | VarKind::String => {
            Some(format!("{}/{encoded}", list_path(kind)))
        }
        _ => None,
    }
}

#[async_trait]
impl VariableStore for PacClient {
    async fn get_scalar(&self, kind: VarKind, name: &str) -> StoreResult<Scalar> {
        let envelope: ValueEnvelope = self
            .get_json(&read_path(kind, name))
            .await
            .map_err(|err| err.into_store("get_scalar", name))?;
        Ok(envelope.value)
    }

    async fn get_table(&self, kind: VarKind, name: &str) -> StoreResult<Vec<Scalar>> {
        let path = format!("{}/{}", list_path(kind), urlencoding::encode(name));
        self.get_json(&path)
            .await
            .map_err(|err| err.into_store("get_table", name))
    }

    async fn set_scalar(&self, kind: VarKind, name: &str, value: Scalar) -> StoreResult<()> {
        let Some(path) = write_path(kind, name) else {
            return Err(paclink_core::StoreError::NotWritable {
                name: name.to_string(),
            });
        };
        self.post_json(&path, &[], &serde_json::json!({ "value": value }))
            .await
            .map_err(|err| err.into_store("set_scalar", name))
    }

    async fn set_table(
        &self,
        kind: VarKind,
        name: &str,
        values: &[Scalar],
        start_index: usize,
    ) -> StoreResult<()> {
        if !kind.is_table() {
            return Err(paclink_core::StoreError::UnexpectedResponse {
                name: name.to_string(),
                details: format!("'{kind}' is not a table kind"),
            });
        }
        let path = format!("{}/{}", list_path(kind), urlencoding::encode(name));
        self.post_json(&path, &[("startIndex", start_index.to_string())], &values)
            .await
            .map_err(|err| err.into_store("set_table", name))
    }

    async fn list_all(&self, kind: VarKind) -> StoreResult<Vec<VarSummary>> {
        self.get_json(list_path(kind))
            .await
            .map_err(|err| err.into_store("list_all", kind.as_str()))
    }
}
