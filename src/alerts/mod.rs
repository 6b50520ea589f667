//! Alerts module for clientscope.
//!
//! Alerts (CVEs, circular dependencies, duplicate files, jQuery conflicts)
//! are computed by the inventory collector. This module types them for
//! display and derives prioritized recommendations from them.

pub mod recommend;
pub mod types;

pub use recommend::{alerts_by_level, recommend, Effort, Recommendation};
pub use types::{Alert, AlertConflict, AlertLevel};
