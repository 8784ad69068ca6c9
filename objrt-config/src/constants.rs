/// Bind address used when neither file nor environment names one.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

pub const DEFAULT_SERVER_PORT: u16 = 9100;

pub const DEFAULT_SSH_PATH: &str = "ssh";

/// Config files tried, in order, when no path was given.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["objrt.toml", "config/objrt.toml"];
