// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for paclink-client.

use paclink_core::StoreError;
use thiserror::Error;

/// Result type using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the controller API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response.
    #[error("http request failed: {0}")]
    Http(String),

    /// The controller answered with a non-success status.
    #[error("api error [{status}] at '{path}': {message}")]
    Api {
        status: u16,
        path: String,
        message: String,
    },

    /// The controller's strategy rejected the operation (nonzero
    /// `errorCode` in an otherwise successful response).
    #[error("strategy error {code} at '{path}'")]
    Strategy { code: i64, path: String },

    /// The response body did not match the expected shape.
    #[error("unexpected payload from '{path}': {details}")]
    Decode { path: String, details: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}

impl ClientError {
    /// Map a client failure onto the store seam's taxonomy: 404 means the
    /// variable does not exist, shape problems are unexpected responses,
    /// anything else makes the store unavailable for the operation.
    pub fn into_store(self, operation: &str, name: &str) -> StoreError {
        match self {
            ClientError::Api { status: 404, .. } => StoreError::NotFound {
                name: name.to_string(),
            },
            ClientError::Decode { details, .. } => StoreError::UnexpectedResponse {
                name: name.to_string(),
                details,
            },
            other => StoreError::Unavailable {
                operation: operation.to_string(),
                details: other.to_string(),
            },
        }
    }
}
