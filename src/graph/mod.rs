//! Graph module for category relationship modeling.
//!
//! This module provides the [`RelationGraph`] struct: forward and reverse
//! adjacency over categories, built once per inventory from its relation
//! list, plus cycle detection.
//!
//! # Example
//!
//! ```rust
//! use clientscope::graph::RelationGraph;
//! use clientscope::inventory::Relation;
//!
//! let graph = RelationGraph::build(&[
//!     Relation::depends("site.page", "site.base"),
//!     Relation::depends("site.base", "site.page"),
//! ]);
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 2);
//! assert!(graph.has_cycles());
//! ```

mod relation_graph;

pub use relation_graph::{Neighbor, RelationGraph};
