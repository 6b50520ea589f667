//! Recommendations derived from collector alerts.
//!
//! Alerts arrive pre-computed. This module only regroups them into
//! actionable suggestions: one entry per problem family, each with
//! concrete actions.

use serde::Serialize;
use serde_json::Value;

use super::types::{Alert, AlertLevel};
use crate::inventory::Inventory;

/// Rough cost of acting on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub fn label(&self) -> &'static str {
        match self {
            Effort::Low => "Low",
            Effort::Medium => "Medium",
            Effort::High => "High",
        }
    }
}

/// A single actionable suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// Stable identifier of the problem family.
    pub id: &'static str,
    pub priority: AlertLevel,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub actions: Vec<String>,
    pub effort: Effort,
    pub benefit: String,
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("?")
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn find<'a>(alerts: &'a [Alert], level: AlertLevel, alert_type: &str) -> Option<&'a Alert> {
    alerts
        .iter()
        .find(|a| a.level == level && a.alert_type == alert_type)
}

/// Builds the recommendation list for an inventory.
///
/// Entries are produced in priority order: security first, then stability,
/// maintainability, payload size and finally audit hints.
///
/// # Example
///
/// ```
/// use clientscope::alerts::{recommend, Alert, AlertLevel};
/// use clientscope::inventory::Inventory;
///
/// let mut inventory = Inventory::default();
/// inventory.alerts.push(
///     Alert::new("NO_CATEGORY", AlertLevel::High, "Clientlibs without category")
///         .with_data(serde_json::json!(["/apps/old/clientlib"])),
/// );
///
/// let recs = recommend(&inventory);
/// assert_eq!(recs.len(), 1);
/// assert_eq!(recs[0].id, "unused-clientlibs");
/// ```
pub fn recommend(inventory: &Inventory) -> Vec<Recommendation> {
    let alerts = &inventory.alerts;
    let mut recs = Vec::new();

    let cves: Vec<&Alert> = alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Critical && a.alert_type == "CVE")
        .collect();
    if !cves.is_empty() {
        recs.push(Recommendation {
            id: "cve-updates",
            priority: AlertLevel::Critical,
            title: format!("{} security vulnerabilities (CVEs)", cves.len()),
            description: "Security vulnerabilities were detected in bundled third-party libraries."
                .to_string(),
            impact: "Major security risk for the application".to_string(),
            actions: cves
                .iter()
                .map(|cve| {
                    format!(
                        "Update {} {} to fix {}",
                        str_field(&cve.data, "library"),
                        str_field(&cve.data, "version"),
                        str_field(&cve.data, "cveId")
                    )
                })
                .collect(),
            effort: Effort::Medium,
            benefit: "Critical - Security".to_string(),
        });
    }

    if let Some(alert) = find(alerts, AlertLevel::Critical, "JQUERY_CONFLICT") {
        let versions = alert
            .data
            .get("versions")
            .map(string_list)
            .unwrap_or_default();
        let mut actions = vec![
            "Migrate every clientlib to the latest stable jQuery (recommended)".to_string(),
            "Isolate legacy code with jQuery.noConflict() and wrap scripts in IIFEs".to_string(),
            "Map which components need which version before consolidating".to_string(),
        ];
        actions.extend(
            alert
                .conflicts
                .iter()
                .map(|c| format!("{} -> {} ({})", c.clientlib, c.dependency, c.risk)),
        );
        recs.push(Recommendation {
            id: "jquery-conflicts",
            priority: AlertLevel::Critical,
            title: format!("jQuery conflicts - {} versions detected", versions.len()),
            description: format!(
                "The application loads jQuery {} at the same time.",
                versions.join(", ")
            ),
            impact: "JavaScript errors, broken features, clashes on $ and jQuery".to_string(),
            actions,
            effort: Effort::High,
            benefit: "Critical - Stability".to_string(),
        });
    }

    if let Some(alert) = find(alerts, AlertLevel::High, "CIRCULAR_DEPENDENCY") {
        let cycles = items(&alert.data);
        recs.push(Recommendation {
            id: "circular-deps",
            priority: AlertLevel::High,
            title: format!("{} circular dependencies", cycles.len()),
            description: "Dependency cycles make the load order unpredictable.".to_string(),
            impact: "Unpredictable load order, possible initialization errors".to_string(),
            actions: cycles
                .iter()
                .enumerate()
                .map(|(i, cycle)| {
                    format!(
                        "Cycle {}: {} -> ... Extract the shared code into a separate clientlib",
                        i + 1,
                        string_list(cycle).join(" -> ")
                    )
                })
                .collect(),
            effort: Effort::Medium,
            benefit: "High - Maintainability".to_string(),
        });
    }

    if let Some(alert) = find(alerts, AlertLevel::High, "NO_CATEGORY") {
        let paths = string_list(&alert.data);
        let mut actions = vec![format!(
            "Review and remove the {} obsolete clientlibs",
            paths.len()
        )];
        actions.extend(paths.iter().cloned());
        recs.push(Recommendation {
            id: "unused-clientlibs",
            priority: AlertLevel::High,
            title: format!("{} clientlibs without category", paths.len()),
            description: "These clientlibs have no category and cannot be referenced.".to_string(),
            impact: "Dead code, needless complexity, wasted build time".to_string(),
            actions,
            effort: Effort::Low,
            benefit: "Medium - Cleanup".to_string(),
        });
    }

    if let Some(alert) = find(alerts, AlertLevel::Medium, "DUPLICATES") {
        let duplicates = items(&alert.data);
        recs.push(Recommendation {
            id: "duplicate-files",
            priority: AlertLevel::Medium,
            title: format!("{} duplicated files", duplicates.len()),
            description: "Identical files (same checksum) exist in several clientlibs.".to_string(),
            impact: "Larger payloads, wasted bandwidth".to_string(),
            actions: duplicates
                .iter()
                .map(|dup| {
                    let paths = dup.get("paths").map(string_list).unwrap_or_default();
                    format!(
                        "Consolidate {} identical files ({}) into one shared clientlib",
                        paths.len(),
                        str_field(dup, "checksum")
                    )
                })
                .collect(),
            effort: Effort::Medium,
            benefit: "Medium - Performance".to_string(),
        });
    }

    if let Some(alert) = find(alerts, AlertLevel::Medium, "EMBED_RISK") {
        let warnings = items(&alert.data);
        recs.push(Recommendation {
            id: "embed-duplication",
            priority: AlertLevel::Medium,
            title: format!("{} duplication risks through embed", warnings.len()),
            description: "Some categories are embedded by several parents, duplicating their code."
                .to_string(),
            impact: "Duplicated code, larger payloads, harder maintenance".to_string(),
            actions: warnings
                .iter()
                .map(|warn| {
                    let parents = warn.get("embeddedBy").map(string_list).unwrap_or_default();
                    format!(
                        "\"{}\" is embedded by {} clientlibs. Consider 'dependencies' instead of 'embed'",
                        str_field(warn, "embeddedCategory"),
                        parents.len()
                    )
                })
                .collect(),
            effort: Effort::Low,
            benefit: "Medium - Optimization".to_string(),
        });
    }

    let unused: Vec<&str> = inventory
        .usages
        .iter()
        .filter(|(_, usages)| usages.is_empty())
        .map(|(cat, _)| cat.as_str())
        .collect();
    if !unused.is_empty() {
        let preview = unused.iter().take(3).copied().collect::<Vec<_>>().join(", ");
        let ellipsis = if unused.len() > 3 { "..." } else { "" };
        recs.push(Recommendation {
            id: "unused-categories",
            priority: AlertLevel::Info,
            title: format!("{} unused categories", unused.len()),
            description: "These categories are not referenced from any HTL, JSP or dialog."
                .to_string(),
            impact: "Possibly dead code, or only used programmatically".to_string(),
            actions: vec![format!(
                "Audit the usage of these {} categories: {}{}",
                unused.len(),
                preview,
                ellipsis
            )],
            effort: Effort::Low,
            benefit: "Low - Audit".to_string(),
        });
    }

    recs
}

/// Groups alerts by level, most severe first. Alerts keep their order
/// within a level.
pub fn alerts_by_level(alerts: &[Alert]) -> Vec<(AlertLevel, Vec<&Alert>)> {
    let mut levels: Vec<AlertLevel> = alerts.iter().map(|a| a.level).collect();
    levels.sort();
    levels.dedup();

    levels
        .into_iter()
        .map(|level| (level, alerts.iter().filter(|a| a.level == level).collect()))
        .collect()
}
