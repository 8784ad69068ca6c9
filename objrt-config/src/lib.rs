//! Configuration library for the Object Runtime server.
//!
//! Settings are layered from built-in defaults, an optional TOML file and
//! the process environment (with `.env` support). The binary applies its
//! own command-line overrides on top of the loaded [`Config`].

#![allow(missing_docs)]

pub mod constants;
pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    ClusterConfig, Config, ConfigMetadata, RootConfig, RootsSource,
    ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
