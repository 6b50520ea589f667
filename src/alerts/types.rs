//! Alert records as delivered by the inventory collector.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inventory::types::null_as_default;

/// Severity of an alert or recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Critical,
    High,
    Medium,
    Info,
    /// Any level label the collector emits that is not listed above.
    #[default]
    #[serde(other)]
    Unknown,
}

impl AlertLevel {
    /// Returns a short indicator for terminal output.
    pub fn icon(&self) -> &'static str {
        match self {
            AlertLevel::Critical => "🔴",
            AlertLevel::High => "🟠",
            AlertLevel::Medium => "🟡",
            AlertLevel::Info => "🔵",
            AlertLevel::Unknown => "⚪",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertLevel::Critical => "CRITICAL",
            AlertLevel::High => "HIGH",
            AlertLevel::Medium => "MEDIUM",
            AlertLevel::Info => "INFO",
            AlertLevel::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// A curated finding about the inventory.
///
/// `data` is opaque and its shape depends on `alert_type`; it is only
/// inspected when deriving recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Alert {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub alert_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub level: AlertLevel,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub impact: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,

    #[serde(default)]
    pub data: serde_json::Value,

    /// Per-clientlib conflicts, reported by jQuery conflict alerts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub conflicts: Vec<AlertConflict>,
}

impl Alert {
    /// Creates an alert with the given type and level.
    pub fn new(alert_type: impl Into<String>, level: AlertLevel, title: impl Into<String>) -> Self {
        Self {
            alert_type: alert_type.into(),
            level,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attaches opaque detail data.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Returns true if the alert carries detail data.
    pub fn has_data(&self) -> bool {
        !self.data.is_null()
    }
}

/// A clientlib pulling in a conflicting dependency.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AlertConflict {
    #[serde(default, deserialize_with = "null_as_default")]
    pub clientlib: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk: String,
}

impl AlertConflict {
    /// The collector marks benign conflicts with a risk label containing `LOW`.
    pub fn is_low_risk(&self) -> bool {
        self.risk.contains("LOW")
    }
}
