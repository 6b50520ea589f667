//! Loader for inventory payloads.
//!
//! The payload is a single JSON document. Decoding is lenient about missing
//! or `null` collections; only unreadable input or structurally unusable
//! documents produce errors.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::types::Inventory;

/// Errors that can occur while loading an inventory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The inventory is structurally unusable.
    #[error("Invalid inventory: {0}")]
    InvalidInventory(String),
}

/// Result type alias for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Loads an inventory from a JSON file.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use clientscope::inventory::parse_file;
///
/// let inventory = parse_file(Path::new("inventory.json")).unwrap();
/// println!("{} clientlibs", inventory.clientlibs.len());
/// ```
pub fn parse_file(path: &Path) -> LoadResult<Inventory> {
    let content = fs::read_to_string(path)?;
    let inventory = parse_str(&content)?;
    debug!(
        path = %path.display(),
        clientlibs = inventory.clientlibs.len(),
        relations = inventory.relations.len(),
        "loaded inventory"
    );
    Ok(inventory)
}

/// Loads an inventory from a JSON string.
///
/// # Example
///
/// ```
/// use clientscope::inventory::parse_str;
///
/// let json = r#"{
///     "clientlibs": [{"path": "/apps/site/base", "name": "base", "categories": ["site.base"]}],
///     "relations": [{"from": "site.page", "to": "site.base", "type": "depends"}]
/// }"#;
///
/// let inventory = parse_str(json).unwrap();
/// assert_eq!(inventory.clientlibs.len(), 1);
/// assert_eq!(inventory.relations.len(), 1);
/// assert!(inventory.usages.is_empty());
/// ```
pub fn parse_str(content: &str) -> LoadResult<Inventory> {
    let mut inventory: Inventory = serde_json::from_str(content)?;

    let before = inventory.relations.len();
    inventory.relations.retain(|rel| !rel.is_dangling());
    let dropped = before - inventory.relations.len();
    if dropped > 0 {
        warn!(dropped, "skipped relations without a source or target category");
    }

    Ok(inventory)
}

/// Validates a parsed inventory.
///
/// Clientlib paths identify clientlibs, so two entries with the same path
/// make lookups ambiguous; lookups then resolve to the first entry.
/// Everything else (dangling categories, self-loops, duplicate relations) is
/// tolerated by the engine. The error is informational: callers may keep
/// working with the inventory.
pub fn validate(inventory: &Inventory) -> LoadResult<()> {
    let mut seen = HashSet::with_capacity(inventory.clientlibs.len());
    for lib in &inventory.clientlibs {
        if !seen.insert(lib.path.as_str()) {
            return Err(LoadError::InvalidInventory(format!(
                "duplicate clientlib path '{}'",
                lib.path
            )));
        }
    }
    Ok(())
}
