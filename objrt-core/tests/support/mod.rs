//! Shared fixtures for core integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use objrt_core::cluster::ScriptedAdapter;
use objrt_core::{PathResolver, RootBinding, RootBindings};
use objrt_model::{JobState, SchedulerHost};

pub const ROOT: &str = "Quartz";
pub const SCHEDULER_HOST: &str = "quartz.example.org";

pub fn bindings() -> Arc<RootBindings> {
    Arc::new(RootBindings::from_iter([RootBinding::new(
        ROOT,
        SchedulerHost::with_default_port(SCHEDULER_HOST),
    )
    .with_title("Quartz Batch System")]))
}

/// Two partitions: `alpha` with three running jobs and an empty `beta`.
pub fn alpha_beta_cluster() -> Arc<ScriptedAdapter> {
    Arc::new(
        ScriptedAdapter::new()
            .with_job("alpha", "101", JobState::Running)
            .with_job("alpha", "102", JobState::Pending)
            .with_job("alpha", "103", JobState::Running)
            .with_partition_count("beta", 0),
    )
}

pub fn resolver(adapter: Arc<ScriptedAdapter>) -> PathResolver {
    PathResolver::new(bindings(), adapter)
}
