use std::process::Stdio;

use async_trait::async_trait;
use objrt_model::SchedulerHost;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, warn};

use super::parse::{
    parse_job_detail, parse_job_listing, parse_partition_listing,
};
use super::{ClusterAdapter, ClusterQuery, ClusterQueryFailure, ClusterReply};

/// How scheduler commands reach the login node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellMode {
    /// `ssh <host> <command>`.
    #[default]
    Ssh,
    /// `sh -c <command>` on the server host; the target host is ignored.
    Local,
}

impl ShellMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ShellMode::Ssh => "ssh",
            ShellMode::Local => "local",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ssh" => Some(ShellMode::Ssh),
            "local" => Some(ShellMode::Local),
            _ => None,
        }
    }
}

/// Cluster adapter that shells out to the Slurm client tools
/// (`sinfo`, `squeue`, `scontrol`).
///
/// The adapter waits for the external process without a deadline; an
/// unresponsive host stalls only the request that asked for it.
#[derive(Debug, Clone)]
pub struct SlurmAdapter {
    shell: ShellMode,
    ssh_path: String,
    batch_mode: bool,
}

impl Default for SlurmAdapter {
    fn default() -> Self {
        Self {
            shell: ShellMode::Ssh,
            ssh_path: "ssh".to_string(),
            batch_mode: true,
        }
    }
}

impl SlurmAdapter {
    pub fn new(shell: ShellMode) -> Self {
        Self {
            shell,
            ..Self::default()
        }
    }

    pub fn with_ssh_path(mut self, ssh_path: impl Into<String>) -> Self {
        self.ssh_path = ssh_path.into();
        self
    }

    /// `BatchMode=yes` makes ssh fail instead of prompting for credentials.
    pub fn with_batch_mode(mut self, batch_mode: bool) -> Self {
        self.batch_mode = batch_mode;
        self
    }

    pub fn shell(&self) -> ShellMode {
        self.shell
    }

    fn build_command(&self, target: &SchedulerHost, script: &str) -> Command {
        match self.shell {
            ShellMode::Ssh => {
                let mut cmd = Command::new(&self.ssh_path);
                cmd.arg("-p").arg(target.port.to_string());
                if self.batch_mode {
                    cmd.args(["-o", "BatchMode=yes"]);
                }
                cmd.arg(&target.host).arg(script);
                cmd
            }
            ShellMode::Local => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(script);
                cmd
            }
        }
    }

    async fn run(
        &self,
        target: &SchedulerHost,
        query: &ClusterQuery,
        script: &str,
    ) -> Result<String, ClusterQueryFailure> {
        debug!(
            %target,
            %query,
            shell = self.shell.as_str(),
            "running scheduler command"
        );

        let output = self
            .build_command(target, script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| {
                ClusterQueryFailure::new(
                    query,
                    target,
                    format!("failed to launch scheduler command: {err}"),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let diagnostic = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|text| !text.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("command exited with {}", output.status)
                });
            warn!(
                %target,
                %query,
                status = %output.status,
                "scheduler command failed"
            );
            return Err(ClusterQueryFailure::new(query, target, diagnostic));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Remote shell text for one query. Arguments are single-quoted.
pub fn script_for(query: &ClusterQuery) -> String {
    match query {
        ClusterQuery::ListPartitions => concat!(
            "for p in $(sinfo -h -o %P); do ",
            "printf '%s %s\\n' \"$p\" ",
            "\"$(squeue -h -p \"${p%\\*}\" | wc -l)\"; ",
            "done"
        )
        .to_string(),
        ClusterQuery::ListJobs { partition } => {
            format!("squeue -h -p {} -o '%i %T'", shell_quote(partition))
        }
        ClusterQuery::JobDetail { job_id } => {
            format!("scontrol show job {}", shell_quote(job_id))
        }
    }
}

pub fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

#[async_trait]
impl ClusterAdapter for SlurmAdapter {
    async fn query(
        &self,
        target: &SchedulerHost,
        query: &ClusterQuery,
    ) -> Result<ClusterReply, ClusterQueryFailure> {
        let stdout = self.run(target, query, &script_for(query)).await?;
        let unparsable =
            |reason: String| ClusterQueryFailure::new(query, target, reason);

        match query {
            ClusterQuery::ListPartitions => parse_partition_listing(&stdout)
                .map(ClusterReply::Partitions)
                .map_err(unparsable),
            ClusterQuery::ListJobs { .. } => parse_job_listing(&stdout)
                .map(ClusterReply::Jobs)
                .map_err(unparsable),
            ClusterQuery::JobDetail { job_id } => {
                parse_job_detail(job_id, &stdout)
                    .map(ClusterReply::JobDetail)
                    .map_err(unparsable)
            }
        }
    }
}
