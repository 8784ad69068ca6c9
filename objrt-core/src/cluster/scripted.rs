//! In-memory adapter that replays a scripted cluster.
//!
//! Used by tests and demos in place of a real scheduler. Every query is
//! recorded so callers can assert on how many round trips a resolution
//! cost.

use async_trait::async_trait;
use objrt_model::{JobState, SchedulerHost};
use parking_lot::{Mutex, RwLock};

use super::{
    ClusterAdapter, ClusterQuery, ClusterQueryFailure, ClusterReply,
    JobDetailRecord, JobRecord, PartitionRecord,
};

#[derive(Debug, Clone, Default)]
struct ScriptedPartition {
    name: String,
    /// Count reported by the partition listing; may disagree with `jobs`.
    job_count: u64,
    jobs: Vec<(String, JobState)>,
}

#[derive(Debug, Default)]
struct ScriptedCluster {
    partitions: Vec<ScriptedPartition>,
    failure: Option<String>,
}

#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    cluster: RwLock<ScriptedCluster>,
    queries: Mutex<Vec<(SchedulerHost, ClusterQuery)>>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a partition whose listing reports `job_count` jobs.
    pub fn with_partition_count(self, name: &str, job_count: u64) -> Self {
        self.cluster.write().partitions.push(ScriptedPartition {
            name: name.to_string(),
            job_count,
            jobs: Vec::new(),
        });
        self
    }

    /// Adds a job under `partition`, creating the partition if needed. The
    /// listed count of the partition follows the number of jobs.
    pub fn with_job(
        self,
        partition: &str,
        job_id: &str,
        state: JobState,
    ) -> Self {
        {
            let mut cluster = self.cluster.write();
            let index = match cluster
                .partitions
                .iter()
                .position(|entry| entry.name == partition)
            {
                Some(index) => index,
                None => {
                    cluster.partitions.push(ScriptedPartition {
                        name: partition.to_string(),
                        ..ScriptedPartition::default()
                    });
                    cluster.partitions.len() - 1
                }
            };
            let entry = &mut cluster.partitions[index];
            entry.jobs.push((job_id.to_string(), state));
            entry.job_count = entry.jobs.len() as u64;
        }
        self
    }

    /// Makes every query fail with `diagnostic`.
    pub fn fail_with(self, diagnostic: &str) -> Self {
        self.cluster.write().failure = Some(diagnostic.to_string());
        self
    }

    /// Changes the listed count of an existing partition.
    pub fn set_job_count(&self, partition: &str, job_count: u64) {
        let mut cluster = self.cluster.write();
        if let Some(entry) = cluster
            .partitions
            .iter_mut()
            .find(|entry| entry.name == partition)
        {
            entry.job_count = job_count;
        }
    }

    pub fn queries(&self) -> Vec<ClusterQuery> {
        self.queries
            .lock()
            .iter()
            .map(|(_, query)| query.clone())
            .collect()
    }

    pub fn targets(&self) -> Vec<SchedulerHost> {
        self.queries
            .lock()
            .iter()
            .map(|(target, _)| target.clone())
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl ClusterAdapter for ScriptedAdapter {
    async fn query(
        &self,
        target: &SchedulerHost,
        query: &ClusterQuery,
    ) -> Result<ClusterReply, ClusterQueryFailure> {
        self.queries.lock().push((target.clone(), query.clone()));

        let cluster = self.cluster.read();
        if let Some(diagnostic) = &cluster.failure {
            return Err(ClusterQueryFailure::new(
                query,
                target,
                diagnostic.clone(),
            ));
        }

        let find_partition = |name: &str| {
            cluster
                .partitions
                .iter()
                .find(|entry| entry.name == name)
        };

        match query {
            ClusterQuery::ListPartitions => Ok(ClusterReply::Partitions(
                cluster
                    .partitions
                    .iter()
                    .map(|entry| {
                        PartitionRecord::new(&entry.name, entry.job_count)
                    })
                    .collect(),
            )),
            ClusterQuery::ListJobs { partition } => {
                let entry = find_partition(partition).ok_or_else(|| {
                    ClusterQueryFailure::new(
                        query,
                        target,
                        format!(
                            "squeue: error: invalid partition specified: \
                             {partition}"
                        ),
                    )
                })?;
                Ok(ClusterReply::Jobs(
                    entry
                        .jobs
                        .iter()
                        .map(|(job_id, state)| {
                            JobRecord::new(job_id, Some(state.clone()))
                        })
                        .collect(),
                ))
            }
            ClusterQuery::JobDetail { job_id } => cluster
                .partitions
                .iter()
                .flat_map(|entry| entry.jobs.iter())
                .find(|(id, _)| id == job_id)
                .map(|(id, state)| {
                    ClusterReply::JobDetail(JobDetailRecord {
                        job_id: id.clone(),
                        state: state.clone(),
                    })
                })
                .ok_or_else(|| {
                    ClusterQueryFailure::new(
                        query,
                        target,
                        "slurm_load_jobs error: Invalid job id specified",
                    )
                }),
        }
    }
}
