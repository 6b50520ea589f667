//! Inventory payload types.
//!
//! These structures mirror the JSON document produced by the clientlib
//! inventory collector. Every collection field tolerates being absent or
//! `null` on the wire and decodes to an empty collection instead.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::alerts::Alert;

/// A category identifier, usually a resource path such as `myapp.components`.
pub type Category = String;

/// Map of category to the places that reference it.
pub type UsageMap = BTreeMap<Category, Vec<Usage>>;

/// Decodes `null` the same way as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Usage maps may carry `null` for an individual category as well.
fn usages_from_wire<'de, D>(deserializer: D) -> Result<UsageMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<Category, Option<Vec<Usage>>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(category, usages)| (category, usages.unwrap_or_default()))
        .collect())
}

/// The full result of one inventory scan.
///
/// Built once per load and never patched: a reload produces a new value.
///
/// # Example
///
/// ```
/// use clientscope::inventory::Inventory;
///
/// let inventory: Inventory = serde_json::from_str(r#"{"clientlibs": null}"#).unwrap();
/// assert!(inventory.clientlibs.is_empty());
/// assert!(inventory.relations.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Inventory {
    /// Every clientlib found by the scan.
    #[serde(default, deserialize_with = "null_as_default")]
    pub clientlibs: Vec<Clientlib>,

    /// Category-level `depends`/`embeds` edges.
    #[serde(default, deserialize_with = "null_as_default")]
    pub relations: Vec<Relation>,

    /// Where each category is referenced from templates and dialogs.
    #[serde(default, deserialize_with = "usages_from_wire")]
    pub usages: UsageMap,

    /// Alerts computed by the collector, rendered as-is.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,

    /// Pre-computed counts, passed through.
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: Summary,
}

impl Inventory {
    /// Finds a clientlib by its exact repository path.
    pub fn clientlib(&self, path: &str) -> Option<&Clientlib> {
        self.clientlibs.iter().find(|lib| lib.path == path)
    }

    /// Returns true if the scan produced nothing at all.
    pub fn is_empty(&self) -> bool {
        self.clientlibs.is_empty() && self.relations.is_empty() && self.usages.is_empty()
    }
}

/// A named, path-identified bundle of front-end assets.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clientlib {
    /// Repository path, unique within an inventory.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,

    /// Node name of the clientlib folder.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Categories this clientlib is published under.
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,

    /// Categories declared as runtime dependencies.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependencies: Vec<Category>,

    /// Categories inlined at build time.
    #[serde(default, deserialize_with = "null_as_default")]
    pub embed: Vec<Category>,

    /// Total size of the bundled files in kilobytes.
    #[serde(rename = "totalKB", default, deserialize_with = "null_as_default")]
    pub total_kb: f64,

    #[serde(rename = "usesJQuery", default, deserialize_with = "null_as_default")]
    pub uses_jquery: bool,

    #[serde(rename = "jqueryVersion", default)]
    pub jquery_version: Option<String>,

    #[serde(rename = "jqueryInfo", default)]
    pub jquery_info: Option<JqueryInfo>,
}

impl Clientlib {
    /// Creates a clientlib with the given path, name and categories.
    pub fn new<I, S>(path: impl Into<String>, name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Category>,
    {
        Self {
            path: path.into(),
            name: name.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Number of declared relations (dependencies plus embeds).
    pub fn relation_count(&self) -> usize {
        self.dependencies.len() + self.embed.len()
    }

    /// Third-party libraries bundled in this clientlib, if any were detected.
    pub fn libraries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.jquery_info
            .iter()
            .flat_map(|info| info.libraries.iter())
            .map(|(name, version)| (name.as_str(), version.as_str()))
    }

    /// Short jQuery note for listings, e.g. `jQuery 3.6.0, jquery-ui 1.12.1`.
    ///
    /// `None` when the clientlib neither uses jQuery nor bundles a detected
    /// library.
    pub fn jquery_summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.uses_jquery {
            match self.jquery_version.as_deref() {
                Some(version) if !version.is_empty() => parts.push(format!("jQuery {}", version)),
                _ => parts.push("jQuery".to_string()),
            }
        }
        for (name, version) in self.libraries() {
            if self.uses_jquery && name.eq_ignore_ascii_case("jquery") {
                continue;
            }
            parts.push(format!("{} {}", name, version));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// jQuery detection details reported by the collector.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct JqueryInfo {
    /// Library name to detected version.
    #[serde(default, deserialize_with = "null_as_default")]
    pub libraries: BTreeMap<String, String>,
}

/// Kind of a category relation.
///
/// Decoding is lenient: `embeds`/`embed` (any case) is an embed, every
/// other label, including a missing one, is a runtime dependency.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    /// Required at runtime, loaded before the dependent.
    #[default]
    Depends,
    /// Inlined into the dependent at build time.
    Embeds,
}

impl From<String> for RelationKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "embeds" | "embed" => RelationKind::Embeds,
            _ => RelationKind::Depends,
        }
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Depends => write!(f, "depends"),
            RelationKind::Embeds => write!(f, "embeds"),
        }
    }
}

/// A directed edge meaning "`from` requires `to`".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: Category,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: RelationKind,
}

impl Relation {
    /// Creates a new relation.
    pub fn new(from: impl Into<Category>, to: impl Into<Category>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
        }
    }

    /// Shorthand for a `depends` relation.
    pub fn depends(from: impl Into<Category>, to: impl Into<Category>) -> Self {
        Self::new(from, to, RelationKind::Depends)
    }

    /// Shorthand for an `embeds` relation.
    pub fn embeds(from: impl Into<Category>, to: impl Into<Category>) -> Self {
        Self::new(from, to, RelationKind::Embeds)
    }

    /// Returns true if either endpoint is missing.
    pub fn is_dangling(&self) -> bool {
        self.from.is_empty() || self.to.is_empty()
    }
}

/// Kind of artifact a usage was found in.
///
/// Labels are matched case-insensitively; anything unrecognized is kept
/// verbatim in [`UsageKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UsageKind {
    Htl,
    Jsp,
    Dialog,
    Other(String),
}

impl Default for UsageKind {
    fn default() -> Self {
        UsageKind::Other(String::new())
    }
}

impl From<String> for UsageKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "htl" => UsageKind::Htl,
            "jsp" => UsageKind::Jsp,
            "dialog" => UsageKind::Dialog,
            _ => UsageKind::Other(value),
        }
    }
}

impl From<UsageKind> for String {
    fn from(kind: UsageKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageKind::Htl => write!(f, "HTL"),
            UsageKind::Jsp => write!(f, "JSP"),
            UsageKind::Dialog => write!(f, "DIALOG"),
            UsageKind::Other(label) => write!(f, "{}", label),
        }
    }
}

/// A reference to a category from a template or dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: UsageKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
}

impl Usage {
    pub fn new(kind: UsageKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Pre-computed scan counts.
///
/// Unknown keys are preserved in `extra` so the summary round-trips.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_clientlibs: Option<u64>,
    pub total_categories: Option<u64>,
    pub total_relations: Option<u64>,
    pub alerts_count: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
