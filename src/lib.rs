//! clientscope - clientlib category dependency and impact analyzer
//!
//! This crate loads a pre-scanned inventory of front-end clientlibs (their
//! categories, declared `dependencies`/`embed` relations and where each
//! category is included) and answers two questions:
//!
//! - what breaks, directly or by cascade, if a clientlib changes
//!   ([`impact`])
//! - what the category graph around the used categories looks like
//!   ([`view`])
//!
//! [`analysis::Analysis`] bundles a loaded inventory with the index and graph
//! both analyses run on.

pub mod alerts;
pub mod analysis;
pub mod export;
pub mod graph;
pub mod impact;
pub mod index;
pub mod inventory;
pub mod view;
