// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Client configuration.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Configuration for one controller connection.
///
/// A config is per-controller and threaded through the constructor, so
/// multiple controllers can be driven concurrently with independent
/// settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller host name or address.
    pub hostname: String,
    /// API key for the PAC Control REST API.
    pub api_key: String,
    /// Whether to verify the controller's TLS certificate. Controllers
    /// ship with self-signed certificates, so this defaults to off.
    pub verify_tls: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Base URL override; when unset, `https://<hostname>/pac` is used.
    pub base_url: Option<String>,
}

impl ClientConfig {
    /// Config for a named controller host.
    pub fn new(hostname: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            api_key: api_key.into(),
            verify_tls: false,
            timeout: Duration::from_millis(10_000),
            base_url: None,
        }
    }

    /// Config for the controller's own runtime (the common deployment:
    /// the integration runs on the controller and talks to itself).
    pub fn localhost(api_key: impl Into<String>) -> Self {
        Self::new("localhost", api_key)
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the client at a non-standard endpoint (development servers,
    /// plain-HTTP test fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Resolved base URL for API requests.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}/pac", self.hostname),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `PACLINK_API_KEY`: API key for the PAC Control REST API
    ///
    /// Optional (with defaults):
    /// - `PACLINK_HOSTNAME`: controller host (default: localhost)
    /// - `PACLINK_VERIFY_TLS`: verify TLS certificates (default: false)
    /// - `PACLINK_TIMEOUT_MS`: request timeout in ms (default: 10000)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PACLINK_API_KEY").map_err(|_| {
            ClientError::Config("missing required environment variable: PACLINK_API_KEY".into())
        })?;
        let hostname =
            std::env::var("PACLINK_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let verify_tls = std::env::var("PACLINK_VERIFY_TLS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let timeout_ms: u64 = std::env::var("PACLINK_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse()
            .map_err(|_| {
                ClientError::Config("invalid value for PACLINK_TIMEOUT_MS: must be milliseconds".into())
            })?;

        Ok(Self::new(hostname, api_key)
            .with_verify_tls(verify_tls)
            .with_timeout(Duration::from_millis(timeout_ms)))
    }
}
