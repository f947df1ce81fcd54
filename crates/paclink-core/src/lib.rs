// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! paclink-core - variable classification, recipe preservation, and scan
//! primitives for PAC Control style controllers.
//!
//! The controller's strategy encodes capabilities in variable names
//! (recipe persistence, historian eligibility, log triggering); this crate
//! turns those names into structured classifications and builds the two
//! workflows that depend on them:
//!
//! - **Recipe preservation**: [`RecipePreserver`] snapshots and restores
//!   recipe-classified variables across firmware downloads, coordinated
//!   through a status variable owned by the strategy.
//! - **Scans**: [`scan`] and [`find_matching`] run the shared
//!   classify-filter-resolve pattern behind historian export, log-trigger
//!   discovery, and regex search.
//!
//! No network I/O happens here. Controller access goes through the
//! [`VariableStore`] seam and backups through [`RecipeFileStore`], so the
//! whole crate is drivable against in-memory fakes.
//!
//! ```ignore
//! use std::sync::Arc;
//! use paclink_core::{FsRecipeFileStore, RecipePreserver};
//!
//! let store: Arc<dyn paclink_core::VariableStore> = controller_store();
//! let files = Arc::new(FsRecipeFileStore::new("/var/lib/paclink/recipes"));
//! let preserver = RecipePreserver::new(store, files);
//! let outcome = preserver.process().await?;
//! ```

pub mod error;
pub mod recipe;
pub mod scan;
pub mod store;
pub mod value;
pub mod variable;

pub use error::{BackupError, PreserveError, StoreError, StoreResult};
pub use recipe::{
    BackupRecord, FsRecipeFileStore, MISSING_VARIABLES_FLAG, MISSING_VARIABLES_TABLE,
    PreserverConfig, ProcessOutcome, RecipeFileStore, RecipePreserver, RecipeStatus,
    STATUS_VARIABLE, WriteDurability,
};
pub use scan::{ScanHit, find_matching, scan};
pub use store::{VarSummary, VariableStore, read_variable, write_variable};
pub use value::{Scalar, VarValue};
pub use variable::{LogGroup, PERSISTABLE_KINDS, VarKind, VariableName};
