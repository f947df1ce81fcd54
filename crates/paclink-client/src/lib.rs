// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! paclink-client - PAC Control REST API client.
//!
//! [`PacClient`] implements the `paclink-core` [`VariableStore`] seam over
//! a controller's REST API, plus device/strategy information and
//! name-dispatched variable access.
//!
//! ```ignore
//! use paclink_client::{ClientConfig, PacClient};
//!
//! let client = PacClient::new(ClientConfig::localhost(api_key))?;
//! let value = client.get_variable("rb_Pump_Setpoint").await?;
//! ```
//!
//! [`VariableStore`]: paclink_core::VariableStore

pub mod client;
pub mod config;
pub mod error;

pub use client::PacClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
