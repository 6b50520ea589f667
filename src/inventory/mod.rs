//! Inventory module for clientscope.
//!
//! This module holds the data contract shared with the inventory collector:
//! clientlibs, category relations, usages, alerts and summary counts, plus
//! the loader that decodes the JSON payload.
//!
//! # Example
//!
//! ```
//! use clientscope::inventory::{parse_str, RelationKind};
//!
//! let inventory = parse_str(r#"{
//!     "relations": [{"from": "site.page", "to": "site.base", "type": "embeds"}]
//! }"#).unwrap();
//!
//! assert_eq!(inventory.relations[0].kind, RelationKind::Embeds);
//! ```

pub mod loader;
pub mod query;
pub mod types;

pub use loader::{parse_file, parse_str, validate, LoadError, LoadResult};
pub use query::{filter_clientlibs, format_kb, sort_clientlibs, SortKey, SortOrder};
pub use types::{
    Category, Clientlib, Inventory, JqueryInfo, Relation, RelationKind, Summary, Usage, UsageKind,
    UsageMap,
};
