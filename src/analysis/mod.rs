//! Analysis module for clientscope.
//!
//! Ties a loaded [`Inventory`](crate::inventory::Inventory) to the structures
//! derived from it: the category index, the relation graph, and through
//! them impact analysis and graph views.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use clientscope::analysis::Analysis;
//! use clientscope::inventory::parse_file;
//!
//! let analysis = Analysis::new(parse_file(Path::new("inventory.json"))?);
//! if let Some(lib) = analysis.resolve_clientlib("/apps/site/clientlibs/base") {
//!     let impact = analysis.analyzer().impact_of(lib);
//!     println!("{} categories to retest", impact.total());
//! }
//! ```

mod snapshot;

pub use snapshot::{Analysis, AnalysisSummary};
