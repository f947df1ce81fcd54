// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recipe preservation: backup records, the status contract, and the
//! save/restore state machine.

pub mod backup;
pub mod preserver;
pub mod status;

pub use self::backup::{BackupRecord, FsRecipeFileStore, RecipeFileStore};
pub use self::preserver::{PreserverConfig, ProcessOutcome, RecipePreserver, WriteDurability};
pub use self::status::{
    MISSING_VARIABLES_FLAG, MISSING_VARIABLES_TABLE, RecipeStatus, STATUS_VARIABLE,
};
