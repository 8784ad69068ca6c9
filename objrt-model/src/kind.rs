use std::fmt::{self, Display};

/// Explicit tag of the three object variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    BatchSystem = 0,
    Partition = 1,
    Job = 2,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] =
        [ObjectKind::BatchSystem, ObjectKind::Partition, ObjectKind::Job];

    /// Kind of the objects this kind owns, if any.
    pub fn child_kind(self) -> Option<ObjectKind> {
        match self {
            ObjectKind::BatchSystem => Some(ObjectKind::Partition),
            ObjectKind::Partition => Some(ObjectKind::Job),
            ObjectKind::Job => None,
        }
    }

    /// Stable snake_case name used in the wire schema.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::BatchSystem => "batch_system",
            ObjectKind::Partition => "partition",
            ObjectKind::Job => "job",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::BatchSystem => write!(f, "Batch System"),
            ObjectKind::Partition => write!(f, "Partition"),
            ObjectKind::Job => write!(f, "Job"),
        }
    }
}
