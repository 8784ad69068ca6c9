//! Viewer-facing snapshot of the model surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in objrtctl or other presentation layers.

pub use super::badge::Badge;
pub use super::icon::Icon;
pub use super::job_state::JobState;
pub use super::kind::ObjectKind;
pub use super::object::{BatchSystem, Job, Partition, RuntimeNode};
pub use super::path::{Endpoint, ObjectPath};
