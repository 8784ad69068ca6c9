pub mod sources;

use std::path::PathBuf;

use objrt_core::cluster::{ShellMode, SlurmAdapter};
use objrt_core::{RootBinding, RootBindings};
use objrt_model::{Endpoint, SchedulerHost};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cluster: ClusterConfig,
    pub roots: Vec<RootConfig>,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Root table handed to the path resolver, in configuration order.
    pub fn root_bindings(&self) -> RootBindings {
        self.roots.iter().map(RootConfig::to_binding).collect()
    }

    /// Endpoint stamped on served snapshots, when one is advertised.
    pub fn advertised_endpoint(&self) -> Option<Endpoint> {
        self.server
            .advertise_host
            .as_ref()
            .map(|host| Endpoint::new(host.clone(), self.server.port))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn slurm_adapter(&self) -> SlurmAdapter {
        SlurmAdapter::new(self.cluster.shell)
            .with_ssh_path(self.cluster.ssh_path.clone())
            .with_batch_mode(self.cluster.batch_mode)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub advertise_host: Option<String>,
}

impl ServerConfig {
    pub fn binds_all_interfaces(&self) -> bool {
        matches!(self.host.as_str(), "0.0.0.0" | "::" | "[::]")
    }
}

#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub shell: ShellMode,
    pub ssh_path: String,
    pub batch_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootConfig {
    pub name: String,
    pub title: Option<String>,
    pub scheduler_host: String,
    pub scheduler_port: u16,
}

impl RootConfig {
    pub fn new(
        name: impl Into<String>,
        scheduler_host: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            scheduler_host: scheduler_host.into(),
            scheduler_port: SchedulerHost::DEFAULT_PORT,
        }
    }

    pub fn to_binding(&self) -> RootBinding {
        let binding = RootBinding::new(
            self.name.clone(),
            SchedulerHost::new(
                self.scheduler_host.clone(),
                self.scheduler_port,
            ),
        );
        match &self.title {
            Some(title) => binding.with_title(title.clone()),
            None => binding,
        }
    }
}

/// Where the root table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootsSource {
    File,
    Env,
    None,
}

#[derive(Debug, Clone)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    pub roots_source: RootsSource,
}
