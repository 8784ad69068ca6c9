use std::collections::HashSet;

use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("root name `{name}` is configured more than once")]
    DuplicateRoot { name: String },
    #[error("root name `{name}` {reason}")]
    InvalidRootName { name: String, reason: &'static str },
    #[error("title of root `{name}` must not contain `/`")]
    InvalidRootTitle { name: String },
    #[error("root `{name}` has an empty scheduler host")]
    EmptySchedulerHost { name: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();
    let mut seen = HashSet::new();

    for root in &config.roots {
        if root.name.is_empty() {
            return Err(ConfigGuardRailError::InvalidRootName {
                name: root.name.clone(),
                reason: "must not be empty",
            });
        }
        if root.name.contains('/') {
            return Err(ConfigGuardRailError::InvalidRootName {
                name: root.name.clone(),
                reason: "must not contain `/`",
            });
        }
        if root.title.as_deref().is_some_and(|title| title.contains('/')) {
            return Err(ConfigGuardRailError::InvalidRootTitle {
                name: root.name.clone(),
            });
        }
        if root.scheduler_host.trim().is_empty() {
            return Err(ConfigGuardRailError::EmptySchedulerHost {
                name: root.name.clone(),
            });
        }
        if !seen.insert(root.name.as_str()) {
            return Err(ConfigGuardRailError::DuplicateRoot {
                name: root.name.clone(),
            });
        }
    }

    if config.roots.is_empty() {
        warnings.push_with_hint(
            "No roots configured; every request will be answered with \
             not found",
            "Add [[roots]] tables to objrt.toml or set \
             OBJRT_ROOTS=name=host[:port]",
        );
    }

    if config.server.binds_all_interfaces()
        && config.server.advertise_host.is_none()
    {
        warnings.push_with_hint(
            format!(
                "Binding to {} without an advertise host; snapshots leave \
                 the server unstamped",
                config.server.host
            ),
            "Set server.advertise_host or OBJRT_ADVERTISE_HOST to the name \
             clients connect to",
        );
    }

    Ok(warnings)
}
