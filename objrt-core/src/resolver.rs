//! Path resolution: turns `/Root/Partition/Job` into a populated snapshot.
//!
//! Every hierarchy level that is walked costs exactly one adapter round
//! trip, and levels below the resolved node are left empty. The resolver
//! holds no mutable state, so one instance is shared by every connection.

use std::sync::Arc;

use objrt_model::{
    BatchSystem, Endpoint, Job, JobState, ObjectHeader, ObjectKind, ObjectPath,
    Partition, RuntimeNode, SchedulerHost,
};
use tracing::debug;

use crate::cluster::{
    ClusterAdapter, ClusterQuery, ClusterQueryFailure, ClusterReply,
    JobDetailRecord, JobRecord, PartitionRecord,
};
use crate::error::{Result, RuntimeError};

/// One entry of the root table: a root name bound to a scheduler host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootBinding {
    pub name: String,
    /// Display title of the batch system; defaults to `name`.
    pub title: String,
    pub scheduler: SchedulerHost,
}

impl RootBinding {
    pub fn new(name: impl Into<String>, scheduler: SchedulerHost) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            scheduler,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Read-only root table. Lookups bind to the first entry with a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootBindings {
    bindings: Vec<RootBinding>,
}

impl RootBindings {
    pub fn new(bindings: Vec<RootBinding>) -> Self {
        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&RootBinding> {
        self.bindings.iter().find(|binding| binding.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RootBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<RootBinding> for RootBindings {
    fn from_iter<T: IntoIterator<Item = RootBinding>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    bindings: Arc<RootBindings>,
    adapter: Arc<dyn ClusterAdapter>,
    origin: Option<Endpoint>,
}

impl PathResolver {
    pub fn new(
        bindings: Arc<RootBindings>,
        adapter: Arc<dyn ClusterAdapter>,
    ) -> Self {
        Self {
            bindings,
            adapter,
            origin: None,
        }
    }

    /// Stamp `origin` on every object this resolver builds.
    pub fn with_origin(mut self, origin: Endpoint) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn bindings(&self) -> &RootBindings {
        &self.bindings
    }

    pub fn origin(&self) -> Option<&Endpoint> {
        self.origin.as_ref()
    }

    pub async fn resolve(&self, raw: &str) -> Result<RuntimeNode> {
        let path = ObjectPath::parse(raw)
            .map_err(|err| RuntimeError::Protocol(err.to_string()))?;
        let segments = path.segments().collect::<Vec<_>>();

        let binding = self
            .bindings
            .get(path.root_segment())
            .ok_or_else(|| RuntimeError::not_found(&path))?;
        let root_path = ObjectPath::root(&binding.name)
            .map_err(|err| RuntimeError::Internal(err.to_string()))?;

        let partitions = self.list_partitions(binding).await?;
        let Some(partition_name) = segments.get(1).copied() else {
            return self
                .batch_system(binding, root_path, partitions)
                .map(RuntimeNode::BatchSystem);
        };

        if !partitions.iter().any(|record| record.name == partition_name) {
            return Err(RuntimeError::not_found(&path));
        }
        let partition_path =
            child_path(&root_path, partition_name, &binding.scheduler)?;

        let jobs = self.list_jobs(binding, partition_name).await?;
        let Some(job_id) = segments.get(2).copied() else {
            return self
                .partition(binding, partition_path, jobs)
                .map(RuntimeNode::Partition);
        };

        if !jobs.iter().any(|record| record.job_id == job_id)
            || segments.len() > 3
        {
            return Err(RuntimeError::not_found(&path));
        }
        let job_path = child_path(&partition_path, job_id, &binding.scheduler)?;

        let detail = self.job_detail(binding, job_id).await?;
        Ok(RuntimeNode::Job(Job::new(
            self.header(ObjectKind::Job, job_path),
            detail.job_id,
            detail.state,
        )))
    }

    fn header(&self, kind: ObjectKind, path: ObjectPath) -> ObjectHeader {
        ObjectHeader::for_child(kind, path).with_origin(self.origin.clone())
    }

    fn batch_system(
        &self,
        binding: &RootBinding,
        path: ObjectPath,
        records: Vec<PartitionRecord>,
    ) -> Result<BatchSystem> {
        let mut partitions: Vec<Partition> = Vec::with_capacity(records.len());
        for record in records {
            if partitions.iter().any(|p| p.header().title() == record.name) {
                continue;
            }
            let child = child_path(&path, &record.name, &binding.scheduler)?;
            partitions.push(Partition::new(
                self.header(ObjectKind::Partition, child),
                record.job_count,
                Vec::new(),
            ));
        }

        let header = ObjectHeader::new(
            ObjectKind::BatchSystem,
            binding.title.clone(),
            path,
        )
        .with_origin(self.origin.clone());
        Ok(BatchSystem::new(
            header,
            binding.scheduler.clone(),
            partitions,
        ))
    }

    /// The resolved partition's count is the length of its live listing.
    fn partition(
        &self,
        binding: &RootBinding,
        path: ObjectPath,
        records: Vec<JobRecord>,
    ) -> Result<Partition> {
        let mut jobs: Vec<Job> = Vec::with_capacity(records.len());
        for record in records {
            if jobs.iter().any(|job| job.job_id() == record.job_id) {
                continue;
            }
            let child = child_path(&path, &record.job_id, &binding.scheduler)?;
            jobs.push(Job::new(
                self.header(ObjectKind::Job, child),
                record.job_id,
                record.state.unwrap_or(JobState::Unknown),
            ));
        }

        Ok(Partition::new(
            self.header(ObjectKind::Partition, path),
            jobs.len() as u64,
            jobs,
        ))
    }

    async fn ask(
        &self,
        binding: &RootBinding,
        query: &ClusterQuery,
    ) -> Result<ClusterReply> {
        debug!(
            root = %binding.name,
            target = %binding.scheduler,
            %query,
            "cluster round trip"
        );
        Ok(self.adapter.query(&binding.scheduler, query).await?)
    }

    async fn list_partitions(
        &self,
        binding: &RootBinding,
    ) -> Result<Vec<PartitionRecord>> {
        let query = ClusterQuery::ListPartitions;
        match self.ask(binding, &query).await? {
            ClusterReply::Partitions(records) => Ok(records),
            other => Err(unexpected(&query, &binding.scheduler, &other)),
        }
    }

    async fn list_jobs(
        &self,
        binding: &RootBinding,
        partition: &str,
    ) -> Result<Vec<JobRecord>> {
        let query = ClusterQuery::ListJobs {
            partition: partition.to_string(),
        };
        match self.ask(binding, &query).await? {
            ClusterReply::Jobs(records) => Ok(records),
            other => Err(unexpected(&query, &binding.scheduler, &other)),
        }
    }

    async fn job_detail(
        &self,
        binding: &RootBinding,
        job_id: &str,
    ) -> Result<JobDetailRecord> {
        let query = ClusterQuery::JobDetail {
            job_id: job_id.to_string(),
        };
        match self.ask(binding, &query).await? {
            ClusterReply::JobDetail(record) => Ok(record),
            other => Err(unexpected(&query, &binding.scheduler, &other)),
        }
    }
}

fn unexpected(
    query: &ClusterQuery,
    target: &SchedulerHost,
    reply: &ClusterReply,
) -> RuntimeError {
    let shape = match reply {
        ClusterReply::Partitions(_) => "a partition listing",
        ClusterReply::Jobs(_) => "a job listing",
        ClusterReply::JobDetail(_) => "a job detail",
    };
    let reason = format!("unexpected reply: got {shape}");
    ClusterQueryFailure::new(query, target, reason).into()
}

/// Scheduler names become path segments; one that cannot is reported as
/// unusable scheduler output.
fn child_path(
    parent: &ObjectPath,
    title: &str,
    target: &SchedulerHost,
) -> Result<ObjectPath> {
    parent.child(title).map_err(|err| {
        let query = ClusterQuery::ListPartitions;
        let query = match parent.depth() {
            1 => query,
            _ => ClusterQuery::ListJobs {
                partition: parent.last_segment().to_string(),
            },
        };
        ClusterQueryFailure::new(&query, target, err.to_string()).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_root_names_bind_to_first() {
        let bindings = RootBindings::from_iter([
            RootBinding::new(
                "Quartz",
                SchedulerHost::with_default_port("a.example.org"),
            ),
            RootBinding::new(
                "Quartz",
                SchedulerHost::with_default_port("b.example.org"),
            ),
        ]);
        assert_eq!(bindings.len(), 2);
        assert_eq!(
            bindings.get("Quartz").map(|b| b.scheduler.host.as_str()),
            Some("a.example.org")
        );
        assert!(bindings.get("BigRed").is_none());
    }

    #[test]
    fn binding_title_defaults_to_name() {
        let binding =
            RootBinding::new("Quartz", SchedulerHost::with_default_port("q"));
        assert_eq!(binding.title, "Quartz");
        assert_eq!(
            binding.with_title("Quartz Cluster").title,
            "Quartz Cluster"
        );
    }
}
