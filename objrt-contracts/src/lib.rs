//! Trait surfaces that describe interactions with Object Runtime data models.

/// The [`RuntimeObject`](runtime_object::RuntimeObject) contract and its
/// implementations for every model variant.
pub mod runtime_object;

/// Frequently used trait combinators for viewer and server crates.
pub mod prelude {
    pub use super::runtime_object::{AsRuntimeObject, RuntimeObject, walk};
}
