// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! paclink-historian - historian export and log-trigger dispatch.
//!
//! Both features are scans over the `paclink-core` classification:
//! [`Historian`] turns historian-classified variables into measurement
//! points, [`LogDispatcher`] assembles structured documents for raised
//! log triggers. Documents leave through the [`NotificationSink`] seam;
//! delivery is fire-and-forget.

pub mod historian;
pub mod log;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_support;

pub use historian::{HISTORIZED_FLAG, Historian, HistorianConfig};
pub use log::{LogConfig, LogDispatcher};
pub use sink::{HttpSink, NotificationSink, StdoutSink};
