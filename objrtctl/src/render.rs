use std::fmt::{self, Display};

use objrt_contracts::prelude::RuntimeObject;
use objrt_model::prelude::RuntimeNode;

/// Human-readable listing of one snapshot: the object itself followed by
/// its direct children.
#[derive(Debug, Clone, Copy)]
pub struct NodeListing<'a>(pub &'a RuntimeNode);

impl Display for NodeListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0;
        let object: &dyn RuntimeObject = node;

        writeln!(f, "{} ({})", object.title(), object.kind())?;
        writeln!(f, "  path:   {}", object.path())?;
        if !object.badge().is_none() {
            writeln!(f, "  badge:  {}", object.badge())?;
        }
        if let (Some(host), Some(port)) = (object.host(), object.port()) {
            writeln!(f, "  origin: {host}:{port}")?;
        }

        match node {
            RuntimeNode::BatchSystem(system) => {
                writeln!(f, "  scheduler: {}", system.scheduler())?;
            }
            RuntimeNode::Partition(partition) => {
                writeln!(f, "  jobs:   {}", partition.job_count())?;
            }
            RuntimeNode::Job(job) => {
                writeln!(f, "  job id: {}", job.job_id())?;
                writeln!(f, "  state:  {}", job.state())?;
            }
        }

        let children = object.children();
        if !children.is_empty() {
            writeln!(f, "children:")?;
            for child in children {
                match child.badge().as_str() {
                    "" => writeln!(f, "  {}", child.title())?,
                    badge => writeln!(f, "  {} [{badge}]", child.title())?,
                }
            }
        }
        Ok(())
    }
}

pub fn render_node(node: &RuntimeNode) -> String {
    NodeListing(node).to_string()
}

/// Pretty-prints a raw response body, falling back to the bytes as text.
pub fn render_value(body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(
            |_| String::from_utf8_lossy(body).into_owned(),
        ),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objrt_model::{
        BatchSystem, Endpoint, Job, JobState, ObjectHeader, ObjectKind,
        ObjectPath, Partition, SchedulerHost,
    };

    fn quartz() -> RuntimeNode {
        let root = ObjectPath::root("Quartz").unwrap();
        let partitions = [("alpha", 3), ("beta", 0)]
            .into_iter()
            .map(|(name, count)| {
                let path = root.child(name).unwrap();
                Partition::new(
                    ObjectHeader::for_child(ObjectKind::Partition, path),
                    count,
                    Vec::new(),
                )
            })
            .collect();
        RuntimeNode::BatchSystem(BatchSystem::new(
            ObjectHeader::new(
                ObjectKind::BatchSystem,
                "Quartz Batch System",
                root,
            ),
            SchedulerHost::with_default_port("quartz.example.org"),
            partitions,
        ))
        .with_origin(Endpoint::new("runtime.example.org", 9100))
    }

    #[test]
    fn batch_system_lists_children_with_badges() {
        let text = render_node(&quartz());
        assert!(text.starts_with("Quartz Batch System"));
        assert!(text.contains("  path:   /Quartz\n"));
        assert!(text.contains("  badge:  2\n"));
        assert!(text.contains("  origin: runtime.example.org:9100\n"));
        assert!(text.contains("  scheduler: quartz.example.org:22\n"));
        assert!(text.contains("  alpha [3]\n"));
        assert!(text.contains("  beta\n"));
    }

    #[test]
    fn job_shows_state_and_no_children() {
        let path = ObjectPath::parse("/Quartz/alpha/101").unwrap();
        let node = RuntimeNode::Job(Job::new(
            ObjectHeader::for_child(ObjectKind::Job, path),
            "101",
            JobState::Running,
        ));
        let text = render_node(&node);
        assert!(text.contains("  job id: 101\n"));
        assert!(text.contains(&format!("  state:  {}\n", JobState::Running)));
        assert!(!text.contains("badge:"));
        assert!(!text.contains("children:"));
        assert!(!text.contains("origin:"));
    }

    #[test]
    fn raw_bodies_are_pretty_printed_when_json() {
        assert_eq!(
            render_value(br#"{"error":"x"}"#),
            "{\n  \"error\": \"x\"\n}"
        );
        assert_eq!(render_value(b"not json"), "not json");
    }
}
