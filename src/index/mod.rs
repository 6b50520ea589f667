//! Category index module.
//!
//! Provides [`CategoryIndex`], the lookup tables from category to
//! clientlibs and usages that every other component resolves through.

mod category_index;

pub use category_index::CategoryIndex;
