// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recipe system coordination state.
//!
//! The controller strategy owns the lifecycle of a single status variable:
//! it sets `RestoreNeededAfterDownload` after a firmware download and
//! `SaveNeeded` when operators change recipe values; the preserver advances
//! the status as it works. The raw integer values are part of the contract
//! with the strategy and must not change.

use std::fmt;

/// Well-known integer variable holding the recipe system status.
pub const STATUS_VARIABLE: &str = "hi_Recipes_Status";

/// Well-known string table receiving the names of variables that could not
/// be restored.
pub const MISSING_VARIABLES_TABLE: &str = "st_Recipes_MissingVariablesError_Variables";

/// Well-known boolean flag raised when the restore pass left variables
/// unrestored.
pub const MISSING_VARIABLES_FLAG: &str = "b_Recipes_MissingVariablesError";

/// Recipe system status, as stored in [`STATUS_VARIABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeStatus {
    RestoreNeededAfterDownload,
    RestoreInProgress,
    SaveNeeded,
    SaveInProgress,
    SaveFinished,
    SaveDelayed,
}

impl RecipeStatus {
    /// Decode the wire value; unknown values are no status at all, and the
    /// preserver leaves them untouched.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(RecipeStatus::RestoreNeededAfterDownload),
            2 => Some(RecipeStatus::RestoreInProgress),
            3 => Some(RecipeStatus::SaveNeeded),
            4 => Some(RecipeStatus::SaveInProgress),
            5 => Some(RecipeStatus::SaveFinished),
            6 => Some(RecipeStatus::SaveDelayed),
            _ => None,
        }
    }

    /// Encode back to the wire value.
    pub fn as_raw(self) -> i64 {
        match self {
            RecipeStatus::RestoreNeededAfterDownload => 1,
            RecipeStatus::RestoreInProgress => 2,
            RecipeStatus::SaveNeeded => 3,
            RecipeStatus::SaveInProgress => 4,
            RecipeStatus::SaveFinished => 5,
            RecipeStatus::SaveDelayed => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecipeStatus::RestoreNeededAfterDownload => "restore_needed_after_download",
            RecipeStatus::RestoreInProgress => "restore_in_progress",
            RecipeStatus::SaveNeeded => "save_needed",
            RecipeStatus::SaveInProgress => "save_in_progress",
            RecipeStatus::SaveFinished => "save_finished",
            RecipeStatus::SaveDelayed => "save_delayed",
        }
    }
}

impl fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_roundtrip() {
        for raw in 1..=6 {
            let status = RecipeStatus::from_raw(raw).expect("known status");
            assert_eq!(status.as_raw(), raw);
        }
    }

    #[test]
    fn test_unknown_raw_values() {
        assert_eq!(RecipeStatus::from_raw(0), None);
        assert_eq!(RecipeStatus::from_raw(7), None);
        assert_eq!(RecipeStatus::from_raw(-1), None);
    }

    #[test]
    fn test_coordination_names_follow_convention() {
        use crate::variable::VariableName;

        let status = VariableName::parse(STATUS_VARIABLE);
        assert!(status.valid);
        assert_eq!(status.kind, Some(crate::variable::VarKind::Int32));
        assert!(status.is_historian);

        let table = VariableName::parse(MISSING_VARIABLES_TABLE);
        assert_eq!(table.kind, Some(crate::variable::VarKind::StringTable));

        let flag = VariableName::parse(MISSING_VARIABLES_FLAG);
        assert!(flag.is_boolean);
    }
}
