//! Graph view module.
//!
//! Builds a laid-out, filtered subgraph of the category relations for
//! display:
//!
//! - [`VisibleSet`]: which categories the view is centred on, owned and
//!   updated by the caller (focus, expand, reset)
//! - [`build_view`]: filters relations by the visible set and assigns each
//!   node a layer and a position
//! - [`LayoutConfig`]: spacing and traversal limits of the layout

mod builder;
mod layout;
mod visible;

pub use builder::{build_view, GraphView, ViewEdge, ViewNode};
pub use layout::{LayoutConfig, Position};
pub use visible::VisibleSet;
