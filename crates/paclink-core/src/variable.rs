// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Variable name classification for the controller naming convention.
//!
//! Strategy variables encode their type and a set of capabilities directly
//! in the name: an optional recipe marker (`r`) and/or historian marker
//! (`h`), a short type token, then one or more `_`-separated alphanumeric
//! segments. `rb_Pump_Setpoint` is a recipe-preserved boolean integer,
//! `hai_Tank_Level` a historized analog input, `b_BatchComplete_Log` a log
//! trigger. Classification is a pure function of the name; no controller
//! I/O happens here.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Marker character for recipe-preserved variables.
pub const RECIPE_MARKER: char = 'r';
/// Marker character for historized variables.
pub const HISTORIAN_MARKER: char = 'h';
/// Separator between the type token and name segments.
pub const SEPARATOR: char = '_';

/// A valid name is an optional marker group, a known type token, then one
/// or more separator-delimited alphanumeric segments.
static VALID_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((r|h|rh|hr)?(ai|ao|b|bt|di|do|dt|f|ft|i|it|s|st|ut))(_([A-Za-z0-9]+))+$")
        .expect("name grammar regex is well-formed")
});

/// Log triggers are boolean integers whose name ends in the `_Log` suffix;
/// the middle capture is the log group id.
static LOG_TRIGGER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(r|h|rh|hr)?b_([A-Za-z0-9]+(_[A-Za-z0-9]+)*)_Log$")
        .expect("log trigger regex is well-formed")
});

/// Strategy variable type, as discriminated by the name's type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    AnalogInput,
    AnalogOutput,
    DigitalInput,
    DigitalOutput,
    Int32,
    Int32Table,
    Float,
    FloatTable,
    String,
    StringTable,
    UpTimer,
    DownTimer,
}

/// The six kinds eligible for recipe preservation.
pub const PERSISTABLE_KINDS: [VarKind; 6] = [
    VarKind::Int32,
    VarKind::Float,
    VarKind::String,
    VarKind::Int32Table,
    VarKind::FloatTable,
    VarKind::StringTable,
];

impl VarKind {
    /// Whether values of this kind are ordered sequences rather than scalars.
    pub fn is_table(self) -> bool {
        matches!(
            self,
            VarKind::Int32Table | VarKind::FloatTable | VarKind::StringTable
        )
    }

    /// Whether this kind is a physical I/O point. I/O points are historized
    /// unconditionally, with or without the historian marker.
    pub fn is_io(self) -> bool {
        matches!(
            self,
            VarKind::AnalogInput
                | VarKind::AnalogOutput
                | VarKind::DigitalInput
                | VarKind::DigitalOutput
        )
    }

    /// Whether this kind participates in recipe save/restore passes.
    pub fn is_persistable(self) -> bool {
        PERSISTABLE_KINDS.contains(&self)
    }

    /// Canonical lowercase name, stable across the public surface.
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::AnalogInput => "analog_input",
            VarKind::AnalogOutput => "analog_output",
            VarKind::DigitalInput => "digital_input",
            VarKind::DigitalOutput => "digital_output",
            VarKind::Int32 => "int32",
            VarKind::Int32Table => "int32_table",
            VarKind::Float => "float",
            VarKind::FloatTable => "float_table",
            VarKind::String => "string",
            VarKind::StringTable => "string_table",
            VarKind::UpTimer => "up_timer",
            VarKind::DownTimer => "down_timer",
        }
    }

    /// Parse the canonical name back into a kind.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "analog_input" => Some(VarKind::AnalogInput),
            "analog_output" => Some(VarKind::AnalogOutput),
            "digital_input" => Some(VarKind::DigitalInput),
            "digital_output" => Some(VarKind::DigitalOutput),
            "int32" => Some(VarKind::Int32),
            "int32_table" => Some(VarKind::Int32Table),
            "float" => Some(VarKind::Float),
            "float_table" => Some(VarKind::FloatTable),
            "string" => Some(VarKind::String),
            "string_table" => Some(VarKind::StringTable),
            "up_timer" => Some(VarKind::UpTimer),
            "down_timer" => Some(VarKind::DownTimer),
            _ => None,
        }
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a stripped type token to its kind. `b`/`i` and `bt`/`it` collapse to
/// the same integer kinds; only `b`/`bt` carry boolean semantics.
fn kind_for_token(token: &str) -> Option<VarKind> {
    match token {
        "ai" => Some(VarKind::AnalogInput),
        "ao" => Some(VarKind::AnalogOutput),
        "b" | "i" => Some(VarKind::Int32),
        "bt" | "it" => Some(VarKind::Int32Table),
        "di" => Some(VarKind::DigitalInput),
        "do" => Some(VarKind::DigitalOutput),
        "dt" => Some(VarKind::DownTimer),
        "f" => Some(VarKind::Float),
        "ft" => Some(VarKind::FloatTable),
        "s" => Some(VarKind::String),
        "st" => Some(VarKind::StringTable),
        "ut" => Some(VarKind::UpTimer),
        _ => None,
    }
}

/// Names of the three companion variables behind a log trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogGroup {
    /// The shared middle segment of the trigger name.
    pub id: String,
    /// String variable holding the log type selector.
    pub log_type_variable: String,
    /// String table listing the variables to include in the document.
    pub variable_names_table: String,
    /// String table listing the field names for those variables.
    pub field_names_table: String,
}

impl LogGroup {
    fn for_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            log_type_variable: format!("s_{id}_LogType"),
            variable_names_table: format!("st_{id}_Variables"),
            field_names_table: format!("st_{id}_Fields"),
        }
    }
}

/// Classified strategy variable name.
///
/// Immutable once built; every field is a deterministic function of `raw`.
/// When `valid` is false all derived fields are unset and callers must not
/// trust them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableName {
    /// The original name string.
    pub raw: String,
    /// Whether `raw` matches the naming grammar.
    pub valid: bool,
    /// Type token with markers stripped, e.g. `b` for `rb_Pump_Setpoint`.
    pub prefix: Option<String>,
    /// Variable kind derived from the stripped type token.
    pub kind: Option<VarKind>,
    /// True for the `b`/`bt` tokens only; `i`/`it` are plain integers.
    pub is_boolean: bool,
    /// Name carries the recipe marker.
    pub is_recipe: bool,
    /// Name carries the historian marker, or the kind is an I/O point.
    pub is_historian: bool,
    /// Name matches the log trigger grammar.
    pub is_log_trigger: bool,
    /// Backup storage key, present iff `is_recipe`.
    pub recipe_key: Option<String>,
    /// Companion variable names, present iff `is_log_trigger`.
    pub log_group: Option<LogGroup>,
}

impl VariableName {
    /// Classify a variable name. Total: invalid names produce `valid: false`
    /// with every derived field unset, never an error.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();

        let Some(caps) = VALID_NAME_REGEX.captures(&raw) else {
            return Self {
                raw,
                valid: false,
                prefix: None,
                kind: None,
                is_boolean: false,
                is_recipe: false,
                is_historian: false,
                is_log_trigger: false,
                recipe_key: None,
                log_group: None,
            };
        };

        // The grammar anchors markers strictly before the type token, so
        // the capture groups already separate them; no byte of the type
        // token is ever consumed as a marker.
        let markers = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let token = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        let mut is_recipe = false;
        let mut is_historian = false;
        for marker in markers.chars() {
            match marker {
                RECIPE_MARKER => is_recipe = true,
                HISTORIAN_MARKER => is_historian = true,
                _ => {}
            }
        }

        let kind = kind_for_token(token);
        let is_boolean = matches!(token, "b" | "bt");
        if kind.is_some_and(VarKind::is_io) {
            is_historian = true;
        }

        let recipe_key = is_recipe.then(|| format!("{raw}.json"));

        let log_group = LOG_TRIGGER_REGEX
            .captures(&raw)
            .and_then(|caps| caps.get(2))
            .map(|id| LogGroup::for_id(id.as_str()));

        Self {
            valid: true,
            prefix: Some(token.to_string()),
            kind,
            is_boolean,
            is_recipe,
            is_historian,
            is_log_trigger: log_group.is_some(),
            recipe_key,
            log_group,
            raw,
        }
    }
}
