// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for paclink-core.

use thiserror::Error;

/// Result type for variable store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by a [`VariableStore`](crate::store::VariableStore)
/// implementation or by code driving one.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named variable does not exist in the running strategy.
    #[error("variable '{name}' not found")]
    NotFound { name: String },

    /// The store could not be reached or the request failed outright.
    /// Aborts the enclosing scan or pass.
    #[error("store request failed during '{operation}': {details}")]
    Unavailable { operation: String, details: String },

    /// The store answered with a payload that does not match the
    /// variable's kind.
    #[error("unexpected response for '{name}': {details}")]
    UnexpectedResponse { name: String, details: String },

    /// The name fails the naming grammar, so no typed operation can be
    /// dispatched for it.
    #[error("variable name '{name}' does not match the naming convention")]
    InvalidName { name: String },

    /// The variable's kind is read-only (inputs, timers).
    #[error("variable '{name}' is not writable")]
    NotWritable { name: String },
}

/// Errors from the backup file backend.
///
/// A missing record is not an error; reads report it as `Ok(None)` so the
/// restore pass can accumulate and report it in bulk.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The record exists but its content is not the expected single-entry
    /// document. Unlike a missing record this is fatal for the pass.
    #[error("backup record '{key}' is corrupt: {details}")]
    Corrupt { key: String, details: String },

    /// Reading or writing the record failed at the filesystem level.
    #[error("backup i/o failed for '{key}': {details}")]
    Io { key: String, details: String },
}

/// Errors from a recipe save or restore pass.
#[derive(Debug, Error)]
pub enum PreserveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Backup(#[from] BackupError),
}
