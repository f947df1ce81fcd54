// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Notification delivery seam.
//!
//! Historian batches and log documents leave paclink through a
//! [`NotificationSink`]: delivery is fire-and-forget, failures are logged
//! and never surfaced to the scan that produced the document. The
//! collector's own wire protocol stays out of scope; a sink only receives
//! a JSON document.

use async_trait::async_trait;
use tracing::warn;

/// Receives JSON documents produced by the export features.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one document. Must not fail the caller; implementations
    /// log and swallow their own errors.
    async fn deliver(&self, doc: &serde_json::Value);
}

/// POSTs documents to a collector URL.
pub struct HttpSink {
    http: reqwest::Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl NotificationSink for HttpSink {
    async fn deliver(&self, doc: &serde_json::Value) {
        match self.http.post(&self.url).json(doc).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(url = %self.url, status = %response.status(), "collector rejected document");
            }
            Ok(_) => {}
            Err(err) => {
                warn!(url = %self.url, %err, "document delivery failed");
            }
        }
    }
}

/// Prints documents as JSON lines. Used by dry runs and development.
pub struct StdoutSink;

#[async_trait]
impl NotificationSink for StdoutSink {
    async fn deliver(&self, doc: &serde_json::Value) {
        println!("{doc}");
    }
}
