//! Impact analysis module for clientscope.
//!
//! Given the categories of a clientlib, computes which other categories
//! (and therefore clientlibs) are affected when it changes:
//!
//! - **direct** impact: categories with a relation to one of the start
//!   categories
//! - **indirect** impact: categories reached by cascading further through
//!   the reverse relation graph
//!
//! A forward, single-hop variant lists what the clientlib itself requires.
//! Both relation kinds cascade the same way; the kind is reported as
//! metadata only.

mod analyzer;

pub use analyzer::{CategoryImpact, Impact, ImpactAnalyzer};
