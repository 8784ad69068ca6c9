use objrt_model::{
    Badge, BatchSystem, Job, ObjectKind, ObjectPath, Partition, RuntimeNode,
};

/// The one capability surface every node exposes to viewers. Optional
/// capabilities (badge, origin) answer with an explicit empty value instead
/// of being absent.
pub trait RuntimeObject {
    /// Display title, unique among siblings.
    fn title(&self) -> &str;

    /// Root-anchored address of the object.
    fn path(&self) -> &ObjectPath;

    /// Raw image bytes (PNG for the built-in icons).
    fn icon(&self) -> &[u8];

    /// Derived display string; [`Badge::None`] when there is nothing to show.
    fn badge(&self) -> Badge;

    /// Variant tag.
    fn kind(&self) -> ObjectKind;

    /// Host of the runtime server this snapshot came from.
    fn host(&self) -> Option<&str>;

    /// Port of the runtime server this snapshot came from.
    fn port(&self) -> Option<u16>;

    /// Direct children in listing order. Empty for levels that were not
    /// visited by the resolution that produced the snapshot.
    fn children(&self) -> Vec<&dyn RuntimeObject>;
}

macro_rules! header_accessors {
    () => {
        fn title(&self) -> &str {
            self.header().title()
        }

        fn path(&self) -> &ObjectPath {
            self.header().path()
        }

        fn icon(&self) -> &[u8] {
            self.header().icon().as_bytes()
        }

        fn host(&self) -> Option<&str> {
            self.header().origin().map(|origin| origin.host.as_str())
        }

        fn port(&self) -> Option<u16> {
            self.header().origin().map(|origin| origin.port)
        }
    };
}

impl RuntimeObject for BatchSystem {
    header_accessors!();

    fn badge(&self) -> Badge {
        BatchSystem::badge(self)
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::BatchSystem
    }

    fn children(&self) -> Vec<&dyn RuntimeObject> {
        self.partitions()
            .iter()
            .map(|partition| partition as &dyn RuntimeObject)
            .collect()
    }
}

impl RuntimeObject for Partition {
    header_accessors!();

    fn badge(&self) -> Badge {
        Partition::badge(self)
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Partition
    }

    fn children(&self) -> Vec<&dyn RuntimeObject> {
        self.jobs()
            .iter()
            .map(|job| job as &dyn RuntimeObject)
            .collect()
    }
}

impl RuntimeObject for Job {
    header_accessors!();

    fn badge(&self) -> Badge {
        Job::badge(self)
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Job
    }

    fn children(&self) -> Vec<&dyn RuntimeObject> {
        Vec::new()
    }
}

impl RuntimeObject for RuntimeNode {
    header_accessors!();

    fn badge(&self) -> Badge {
        RuntimeNode::badge(self)
    }

    fn kind(&self) -> ObjectKind {
        RuntimeNode::kind(self)
    }

    fn children(&self) -> Vec<&dyn RuntimeObject> {
        self.as_object().children()
    }
}

/// Borrow the active variant as a trait object.
pub trait AsRuntimeObject {
    /// The variant behind `self`, viewed through [`RuntimeObject`].
    fn as_object(&self) -> &dyn RuntimeObject;
}

impl AsRuntimeObject for RuntimeNode {
    fn as_object(&self) -> &dyn RuntimeObject {
        match self {
            RuntimeNode::BatchSystem(system) => system,
            RuntimeNode::Partition(partition) => partition,
            RuntimeNode::Job(job) => job,
        }
    }
}

/// Depth-first, pre-order walk over `root` and all of its descendants.
pub fn walk<'a>(
    root: &'a dyn RuntimeObject,
    visit: &mut dyn FnMut(&'a dyn RuntimeObject),
) {
    visit(root);
    for child in root.children() {
        walk(child, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objrt_model::{Endpoint, JobState, ObjectHeader, SchedulerHost};

    fn partition_node() -> RuntimeNode {
        let path = ObjectPath::parse("/Quartz/general").unwrap();
        let jobs = ["11", "12"]
            .into_iter()
            .map(|id| {
                let job_path = path.child(id).unwrap();
                Job::new(
                    ObjectHeader::for_child(ObjectKind::Job, job_path),
                    id,
                    JobState::Pending,
                )
            })
            .collect::<Vec<_>>();
        RuntimeNode::Partition(Partition::new(
            ObjectHeader::for_child(ObjectKind::Partition, path),
            2,
            jobs,
        ))
    }

    #[test]
    fn node_delegates_to_active_variant() {
        let node = partition_node();
        let object: &dyn RuntimeObject = &node;

        assert_eq!(object.title(), "general");
        assert_eq!(object.kind(), ObjectKind::Partition);
        assert_eq!(object.badge(), Badge::Text("2".into()));
        assert_eq!(object.host(), None);
        assert_eq!(object.port(), None);
        assert_eq!(
            object
                .children()
                .iter()
                .map(|child| child.title())
                .collect::<Vec<_>>(),
            ["11", "12"]
        );
        assert!(object.icon().starts_with(b"\x89PNG"));
    }

    #[test]
    fn walk_visits_every_object_once() {
        let node = partition_node()
            .with_origin(Endpoint::new("runtime.example.org", 9100));
        let mut seen = Vec::new();
        walk(&node, &mut |object| {
            assert_eq!(object.host(), Some("runtime.example.org"));
            assert_eq!(object.port(), Some(9100));
            seen.push(object.path().to_string());
        });
        assert_eq!(
            seen,
            ["/Quartz/general", "/Quartz/general/11", "/Quartz/general/12"]
        );
    }

    #[test]
    fn batch_system_children_are_partitions() {
        let root = ObjectPath::root("Quartz").unwrap();
        let system = BatchSystem::new(
            ObjectHeader::new(ObjectKind::BatchSystem, "Quartz", root.clone()),
            SchedulerHost::with_default_port("quartz.example.org"),
            vec![Partition::new(
                ObjectHeader::for_child(
                    ObjectKind::Partition,
                    root.child("gpu").unwrap(),
                ),
                0,
                Vec::new(),
            )],
        );
        let children = RuntimeObject::children(&system);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), ObjectKind::Partition);
        assert!(children[0].badge().is_none());
    }
}
