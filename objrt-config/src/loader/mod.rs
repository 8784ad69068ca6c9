pub mod error;

use std::fs;
use std::path::{Path, PathBuf};

use objrt_core::cluster::ShellMode;
use objrt_model::SchedulerHost;
use once_cell::sync::Lazy;
use tracing::debug;

use self::error::ConfigLoadError;
use crate::constants::{
    DEFAULT_CONFIG_FILES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SSH_PATH,
};
use crate::models::sources::{
    EnvConfig, FileConfig, FileRootConfig, parse_roots_env,
};
use crate::models::{
    ClusterConfig, Config, ConfigMetadata, RootConfig, RootsSource,
    ServerConfig,
};
use crate::validation::{self, ConfigWarnings};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> =
    Lazy::new(|| DEFAULT_CONFIG_FILES.iter().map(PathBuf::from).collect());

#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Loads `.env`, gathers the process environment and composes the final
    /// configuration.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                dotenvy::Error::Io(_) => Ok(false),
                _ => Err(err),
            })?,
        };

        self.compose(EnvConfig::gather(), env_file_loaded)
    }

    /// Composes configuration from an explicit environment snapshot,
    /// without touching `.env` or the process environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        self.compose(env, false)
    }

    fn compose(
        &self,
        env: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            compose_config(file_config, env, config_path, env_file_loaded)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let resolved = match (&self.config_path, &env_config.config_path) {
            (Some(explicit), _) => Some((explicit.clone(), true)),
            (None, Some(from_env)) => Some((from_env.clone(), true)),
            (None, None) => DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .map(|found| (found.clone(), false)),
        };

        let Some((path, explicit)) = resolved else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    config_path: Option<PathBuf>,
    env_file_loaded: bool,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if file_config.is_none() {
        warnings.push_with_hint(
            "No objrt.toml detected; falling back to environment variables",
            "Pass --config or set OBJRT_CONFIG_PATH to point at a \
             configuration file",
        );
    }

    let FileConfig {
        server: file_server,
        cluster: file_cluster,
        roots: file_roots,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
        port: env
            .server_port
            .or(file_server.port)
            .unwrap_or(DEFAULT_SERVER_PORT),
        advertise_host: env.advertise_host.or(file_server.advertise_host),
    };

    let env_shell = env
        .cluster_shell
        .map(|raw| {
            ShellMode::parse(&raw)
                .ok_or(ConfigLoadError::InvalidShell { value: raw })
        })
        .transpose()?;
    let cluster = ClusterConfig {
        shell: env_shell.or(file_cluster.shell).unwrap_or_default(),
        ssh_path: env
            .ssh_path
            .or(file_cluster.ssh_path)
            .unwrap_or_else(|| DEFAULT_SSH_PATH.to_string()),
        batch_mode: env
            .ssh_batch_mode
            .or(file_cluster.batch_mode)
            .unwrap_or(true),
    };

    let (roots, roots_source) = match env.roots {
        Some(raw) => {
            let parsed = parse_roots_env(&raw)
                .map_err(|reason| ConfigLoadError::InvalidRootsEnv { reason })?;
            (parsed, RootsSource::Env)
        }
        None if !file_roots.is_empty() => (file_roots, RootsSource::File),
        None => (Vec::new(), RootsSource::None),
    };

    let config = Config {
        server,
        cluster,
        roots: roots.into_iter().map(root_config).collect(),
        metadata: ConfigMetadata {
            config_path,
            env_file_loaded,
            roots_source,
        },
    };

    let guard_warnings = validation::apply_guard_rails(&config)?;
    warnings.extend(guard_warnings);

    Ok((config, warnings))
}

fn root_config(raw: FileRootConfig) -> RootConfig {
    RootConfig {
        name: raw.name.trim().to_string(),
        title: raw
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty()),
        scheduler_host: raw.scheduler_host.trim().to_string(),
        scheduler_port: raw
            .scheduler_port
            .unwrap_or(SchedulerHost::DEFAULT_PORT),
    }
}
