#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use objrt_config::{Config, ConfigLoader, EnvConfig};
use objrt_core::ClusterAdapter;
use objrt_core::cluster::ScriptedAdapter;
use objrt_model::JobState;
use objrt_server::RuntimeServer;
use objrt_server::startup::build_resolver_with_adapter;
use tokio::task::JoinHandle;

pub const ROOT: &str = "Quartz";

/// A server bound to an ephemeral loopback port. The accept loop is
/// aborted when the handle is dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    task: JoinHandle<()>,
}

impl TestServer {
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn config(advertise_host: Option<&str>) -> Config {
    let env = EnvConfig {
        server_host: Some("127.0.0.1".into()),
        server_port: Some(0),
        advertise_host: advertise_host.map(str::to_string),
        roots: Some(format!("{ROOT}=quartz.example.org")),
        ..EnvConfig::default()
    };
    ConfigLoader::new()
        .load_with_env(env)
        .expect("test configuration")
        .config
}

/// `alpha` lists jobs 101..103, `beta` is empty.
pub fn alpha_beta_cluster() -> ScriptedAdapter {
    ScriptedAdapter::new()
        .with_job("alpha", "101", JobState::Running)
        .with_job("alpha", "102", JobState::Pending)
        .with_job("alpha", "103", JobState::Running)
        .with_partition_count("beta", 0)
}

pub async fn spawn_with(
    config: &Config,
    adapter: Arc<dyn ClusterAdapter>,
) -> TestServer {
    let resolver = build_resolver_with_adapter(config, adapter);
    let server = RuntimeServer::bind("127.0.0.1:0", resolver)
        .await
        .expect("bind test server");
    let addr = server.local_addr().expect("local addr");
    let task = tokio::spawn(async move {
        let _ = server.serve().await;
    });
    TestServer { addr, task }
}

pub async fn spawn(adapter: Arc<dyn ClusterAdapter>) -> TestServer {
    spawn_with(&config(None), adapter).await
}
