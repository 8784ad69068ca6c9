//! Core data model definitions shared across Object Runtime crates.
#![allow(missing_docs)]

pub mod badge;
pub mod error;
pub mod icon;
pub mod job_state;
pub mod kind;
pub mod object;
pub mod path;
pub mod prelude;

// Intentionally curated re-exports for downstream consumers.
pub use badge::Badge;
pub use error::{ModelError, Result as ModelResult};
pub use icon::{Icon, default_icon};
pub use job_state::JobState;
pub use kind::ObjectKind;
pub use object::{BatchSystem, Job, ObjectHeader, Partition, RuntimeNode};
pub use path::{Endpoint, ObjectPath, SchedulerHost, validate_title};
