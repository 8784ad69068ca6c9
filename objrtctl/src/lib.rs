//! Library half of `objrtctl`: turns fetched snapshots into terminal text.
#![allow(missing_docs)]

pub mod render;

pub use render::{NodeListing, render_node, render_value};
