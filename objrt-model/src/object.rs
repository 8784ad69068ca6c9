//! The three object variants and the [`RuntimeNode`] sum type.
//!
//! Variants are independent structs that embed an [`ObjectHeader`]; the only
//! relation between them is ownership (a batch system owns partitions, a
//! partition owns jobs). Objects have no setters: a snapshot is built once
//! and then only read. [`RuntimeNode::with_origin`] consumes the node, so
//! stamping a network origin is part of construction rather than a mutation
//! of a shared graph.

use crate::badge::Badge;
use crate::icon::Icon;
use crate::job_state::JobState;
use crate::kind::ObjectKind;
use crate::path::{Endpoint, ObjectPath, SchedulerHost};

/// Identity block shared by every variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHeader {
    title: String,
    path: ObjectPath,
    icon: Icon,
    origin: Option<Endpoint>,
}

impl ObjectHeader {
    /// Header with the kind's default icon and no origin.
    pub fn new(
        kind: ObjectKind,
        title: impl Into<String>,
        path: ObjectPath,
    ) -> Self {
        Self {
            title: title.into(),
            path,
            icon: Icon::default_for(kind),
            origin: None,
        }
    }

    /// Header for a child object: the title is the last path segment.
    pub fn for_child(kind: ObjectKind, path: ObjectPath) -> Self {
        let title = path.last_segment().to_string();
        Self::new(kind, title, path)
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_origin(mut self, origin: Option<Endpoint>) -> Self {
        self.origin = origin;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    pub fn origin(&self) -> Option<&Endpoint> {
        self.origin.as_ref()
    }
}

/// Root object bound to one scheduler host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSystem {
    header: ObjectHeader,
    scheduler: SchedulerHost,
    partitions: Vec<Partition>,
}

impl BatchSystem {
    pub fn new(
        header: ObjectHeader,
        scheduler: SchedulerHost,
        partitions: Vec<Partition>,
    ) -> Self {
        Self {
            header,
            scheduler,
            partitions,
        }
    }

    pub fn header(&self) -> &ObjectHeader {
        &self.header
    }

    pub fn scheduler(&self) -> &SchedulerHost {
        &self.scheduler
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn badge(&self) -> Badge {
        Badge::count(self.partitions.len() as u64)
    }

    fn stamp(mut self, origin: &Endpoint) -> Self {
        self.header.origin = Some(origin.clone());
        self.partitions = self
            .partitions
            .into_iter()
            .map(|partition| partition.stamp(origin))
            .collect();
        self
    }
}

/// Scheduler partition carrying a live job count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    header: ObjectHeader,
    job_count: u64,
    jobs: Vec<Job>,
}

impl Partition {
    pub fn new(header: ObjectHeader, job_count: u64, jobs: Vec<Job>) -> Self {
        Self {
            header,
            job_count,
            jobs,
        }
    }

    pub fn header(&self) -> &ObjectHeader {
        &self.header
    }

    pub fn job_count(&self) -> u64 {
        self.job_count
    }

    /// Jobs, populated only when this partition was the resolved node.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn badge(&self) -> Badge {
        Badge::count(self.job_count)
    }

    fn stamp(mut self, origin: &Endpoint) -> Self {
        self.header.origin = Some(origin.clone());
        self.jobs =
            self.jobs.into_iter().map(|job| job.stamp(origin)).collect();
        self
    }
}

/// Scheduler job carrying its execution state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    header: ObjectHeader,
    job_id: String,
    state: JobState,
}

impl Job {
    pub fn new(
        header: ObjectHeader,
        job_id: impl Into<String>,
        state: JobState,
    ) -> Self {
        Self {
            header,
            job_id: job_id.into(),
            state,
        }
    }

    pub fn header(&self) -> &ObjectHeader {
        &self.header
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Jobs never own children, so there is no count to show.
    pub fn badge(&self) -> Badge {
        Badge::None
    }

    fn stamp(mut self, origin: &Endpoint) -> Self {
        self.header.origin = Some(origin.clone());
        self
    }
}

/// Root of a resolved snapshot: whichever variant the requested path named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeNode {
    BatchSystem(BatchSystem),
    Partition(Partition),
    Job(Job),
}

impl RuntimeNode {
    pub fn kind(&self) -> ObjectKind {
        match self {
            RuntimeNode::BatchSystem(_) => ObjectKind::BatchSystem,
            RuntimeNode::Partition(_) => ObjectKind::Partition,
            RuntimeNode::Job(_) => ObjectKind::Job,
        }
    }

    pub fn header(&self) -> &ObjectHeader {
        match self {
            RuntimeNode::BatchSystem(system) => system.header(),
            RuntimeNode::Partition(partition) => partition.header(),
            RuntimeNode::Job(job) => job.header(),
        }
    }

    pub fn title(&self) -> &str {
        self.header().title()
    }

    pub fn path(&self) -> &ObjectPath {
        self.header().path()
    }

    pub fn origin(&self) -> Option<&Endpoint> {
        self.header().origin()
    }

    pub fn badge(&self) -> Badge {
        match self {
            RuntimeNode::BatchSystem(system) => system.badge(),
            RuntimeNode::Partition(partition) => partition.badge(),
            RuntimeNode::Job(job) => job.badge(),
        }
    }

    /// Titles of the direct children, in listing order.
    pub fn child_titles(&self) -> Vec<&str> {
        match self {
            RuntimeNode::BatchSystem(system) => system
                .partitions()
                .iter()
                .map(|partition| partition.header().title())
                .collect(),
            RuntimeNode::Partition(partition) => partition
                .jobs()
                .iter()
                .map(|job| job.header().title())
                .collect(),
            RuntimeNode::Job(_) => Vec::new(),
        }
    }

    pub fn has_child(&self, title: &str) -> bool {
        self.child_titles().into_iter().any(|child| child == title)
    }

    /// First direct child titled `title`, detached as its own node.
    pub fn find_child(&self, title: &str) -> Option<RuntimeNode> {
        match self {
            RuntimeNode::BatchSystem(system) => system
                .partitions()
                .iter()
                .find(|partition| partition.header().title() == title)
                .cloned()
                .map(RuntimeNode::Partition),
            RuntimeNode::Partition(partition) => partition
                .jobs()
                .iter()
                .find(|job| job.header().title() == title)
                .cloned()
                .map(RuntimeNode::Job),
            RuntimeNode::Job(_) => None,
        }
    }

    /// Stamps `origin` onto this node and every descendant.
    pub fn with_origin(self, origin: Endpoint) -> Self {
        match self {
            RuntimeNode::BatchSystem(system) => {
                RuntimeNode::BatchSystem(system.stamp(&origin))
            }
            RuntimeNode::Partition(partition) => {
                RuntimeNode::Partition(partition.stamp(&origin))
            }
            RuntimeNode::Job(job) => RuntimeNode::Job(job.stamp(&origin)),
        }
    }
}

impl From<BatchSystem> for RuntimeNode {
    fn from(value: BatchSystem) -> Self {
        RuntimeNode::BatchSystem(value)
    }
}

impl From<Partition> for RuntimeNode {
    fn from(value: Partition) -> Self {
        RuntimeNode::Partition(value)
    }
}

impl From<Job> for RuntimeNode {
    fn from(value: Job) -> Self {
        RuntimeNode::Job(value)
    }
}
