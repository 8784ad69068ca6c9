use std::sync::Arc;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use objrt_core::cluster::ScriptedAdapter;
use objrt_core::{PathResolver, RootBinding, RootBindings};
use objrt_model::{JobState, SchedulerHost};
use objrt_server::RuntimeServer;
use tokio::runtime::Runtime;

/// A runtime server on an ephemeral loopback port, driven by its own
/// runtime so the CLI under test can be run synchronously. Dropping it
/// stops the server.
pub struct TestServer {
    pub port: u16,
    _runtime: Runtime,
}

impl TestServer {
    /// `objrtctl` pointed at this server.
    pub fn objrtctl(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("objrtctl");
        cmd.args(["--host", "127.0.0.1", "--port"])
            .arg(self.port.to_string())
            .args(["--timeout-secs", "5"]);
        cmd
    }
}

/// Serves `/Quartz` with `alpha` (jobs 101..103) and an empty `beta`.
pub fn spawn() -> TestServer {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("test runtime");

    let adapter = Arc::new(
        ScriptedAdapter::new()
            .with_job("alpha", "101", JobState::Running)
            .with_job("alpha", "102", JobState::Pending)
            .with_job("alpha", "103", JobState::Running)
            .with_partition_count("beta", 0),
    );
    let bindings = Arc::new(RootBindings::from_iter([RootBinding::new(
        "Quartz",
        SchedulerHost::with_default_port("quartz.example.org"),
    )
    .with_title("Quartz Batch System")]));
    let resolver = PathResolver::new(bindings, adapter);

    let server = runtime
        .block_on(RuntimeServer::bind("127.0.0.1:0", resolver))
        .expect("bind test server");
    let port = server.local_addr().expect("local addr").port();
    runtime.spawn(async move {
        let _ = server.serve().await;
    });

    TestServer {
        port,
        _runtime: runtime,
    }
}
