//! Boundary to the external job scheduler.
//!
//! The path resolver talks to the cluster only through [`ClusterAdapter`].
//! Adapters hold no per-request state and are shared by every connection.

pub mod parse;
pub mod scripted;
pub mod slurm;

use std::fmt::{self, Display};

use async_trait::async_trait;
use objrt_model::{JobState, SchedulerHost};
use thiserror::Error;

pub use scripted::ScriptedAdapter;
pub use slurm::{ShellMode, SlurmAdapter};

/// One question the resolver can ask the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClusterQuery {
    ListPartitions,
    ListJobs { partition: String },
    JobDetail { job_id: String },
}

impl Display for ClusterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterQuery::ListPartitions => write!(f, "ListPartitions"),
            ClusterQuery::ListJobs { partition } => {
                write!(f, "ListJobs({partition})")
            }
            ClusterQuery::JobDetail { job_id } => {
                write!(f, "JobDetail({job_id})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRecord {
    pub name: String,
    pub job_count: u64,
}

impl PartitionRecord {
    pub fn new(name: impl Into<String>, job_count: u64) -> Self {
        Self {
            name: name.into(),
            job_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub job_id: String,
    /// Present when the listing reports states alongside ids.
    pub state: Option<JobState>,
}

impl JobRecord {
    pub fn new(job_id: impl Into<String>, state: Option<JobState>) -> Self {
        Self {
            job_id: job_id.into(),
            state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetailRecord {
    pub job_id: String,
    pub state: JobState,
}

/// Normalized answer to a [`ClusterQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterReply {
    Partitions(Vec<PartitionRecord>),
    Jobs(Vec<JobRecord>),
    JobDetail(JobDetailRecord),
}

/// The external scheduler command failed or printed something unusable.
/// `diagnostic` holds the command's own error text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cluster query {query} on {target} failed: {diagnostic}")]
pub struct ClusterQueryFailure {
    pub query: ClusterQuery,
    pub target: SchedulerHost,
    pub diagnostic: String,
}

impl ClusterQueryFailure {
    pub fn new(
        query: &ClusterQuery,
        target: &SchedulerHost,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            query: query.clone(),
            target: target.clone(),
            diagnostic: diagnostic.into(),
        }
    }
}

#[async_trait]
pub trait ClusterAdapter: Send + Sync + fmt::Debug {
    /// Runs one query against the scheduler reachable through `target`.
    async fn query(
        &self,
        target: &SchedulerHost,
        query: &ClusterQuery,
    ) -> Result<ClusterReply, ClusterQueryFailure>;
}

#[async_trait]
impl<T: ClusterAdapter + ?Sized> ClusterAdapter for std::sync::Arc<T> {
    async fn query(
        &self,
        target: &SchedulerHost,
        query: &ClusterQuery,
    ) -> Result<ClusterReply, ClusterQueryFailure> {
        (**self).query(target, query).await
    }
}
