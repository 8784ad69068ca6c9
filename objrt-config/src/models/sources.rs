use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub cluster: FileClusterConfig,
    #[serde(default)]
    pub roots: Vec<FileRootConfig>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertise_host: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileClusterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<objrt_core::cluster::ShellMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_mode: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileRootConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub scheduler_host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler_port: Option<u16>,
}

/// Environment-derived configuration values.
///
/// Values that need validation (`OBJRT_CLUSTER_SHELL`, `OBJRT_ROOTS`) are
/// kept raw and checked by the loader so a typo is reported instead of
/// silently ignored.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub advertise_host: Option<String>,
    pub cluster_shell: Option<String>,
    pub ssh_path: Option<String>,
    pub ssh_batch_mode: Option<bool>,
    pub config_path: Option<PathBuf>,
    pub roots: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self::default();

        env_config.server_host = non_empty_var("OBJRT_SERVER_HOST");
        env_config.server_port = std::env::var("OBJRT_SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok());
        env_config.advertise_host = non_empty_var("OBJRT_ADVERTISE_HOST");
        env_config.cluster_shell = non_empty_var("OBJRT_CLUSTER_SHELL");
        env_config.ssh_path = non_empty_var("OBJRT_SSH_PATH");
        env_config.ssh_batch_mode = parse_bool_var("OBJRT_SSH_BATCH_MODE");
        env_config.config_path =
            non_empty_var("OBJRT_CONFIG_PATH").map(PathBuf::from);
        env_config.roots = non_empty_var("OBJRT_ROOTS");

        env_config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    })
}

/// Parses `OBJRT_ROOTS`: comma-separated `name=host[:port]` entries.
pub fn parse_roots_env(raw: &str) -> Result<Vec<FileRootConfig>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, target) = entry.split_once('=').ok_or_else(|| {
                format!("`{entry}` is not of the form name=host[:port]")
            })?;
            let (host, port) = match target.rsplit_once(':') {
                Some((host, port)) => {
                    let port = port.parse::<u16>().map_err(|_| {
                        format!("`{entry}` has an invalid port `{port}`")
                    })?;
                    (host, Some(port))
                }
                None => (target, None),
            };
            Ok(FileRootConfig {
                name: name.trim().to_string(),
                title: None,
                scheduler_host: host.trim().to_string(),
                scheduler_port: port,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_env_accepts_optional_ports() {
        let roots = parse_roots_env(
            "Quartz=quartz.example.org, BigRed=br.example.org:2222,",
        )
        .expect("parse");
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].name, "Quartz");
        assert_eq!(roots[0].scheduler_port, None);
        assert_eq!(roots[1].scheduler_host, "br.example.org");
        assert_eq!(roots[1].scheduler_port, Some(2222));
    }

    #[test]
    fn roots_env_rejects_malformed_entries() {
        assert!(parse_roots_env("Quartz").unwrap_err().contains("name=host"));
        assert!(
            parse_roots_env("Quartz=q.example.org:ssh")
                .unwrap_err()
                .contains("invalid port")
        );
    }

    #[test]
    fn file_config_reads_root_tables() {
        let parsed: FileConfig = toml::from_str(
            r#"
            [server]
            port = 9200

            [cluster]
            shell = "local"

            [[roots]]
            name = "Quartz"
            title = "Quartz Batch System"
            scheduler_host = "quartz.example.org"
            "#,
        )
        .expect("parse");
        assert_eq!(parsed.server.port, Some(9200));
        assert_eq!(
            parsed.cluster.shell,
            Some(objrt_core::cluster::ShellMode::Local)
        );
        assert_eq!(
            parsed.roots[0].title.as_deref(),
            Some("Quartz Batch System")
        );
        assert_eq!(parsed.roots[0].scheduler_port, None);
    }
}
