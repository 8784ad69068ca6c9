use std::fmt::{self, Display};

use crate::error::{ModelError, Result};

/// Root-anchored, `/`-delimited address of an object in the served
/// hierarchy, e.g. `/Quartz/general/4711`.
///
/// A parsed path always has at least one segment and no empty segments. A
/// single trailing `/` is accepted and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath {
    raw: String,
}

impl ObjectPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason| ModelError::InvalidPath {
            path: raw.to_string(),
            reason,
        };

        let body = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("path must start with `/`"))?;
        let body = body.strip_suffix('/').unwrap_or(body);

        if body.is_empty() {
            return Err(invalid("path has no root segment"));
        }
        if body.split('/').any(str::is_empty) {
            return Err(invalid("path contains an empty segment"));
        }

        Ok(Self {
            raw: format!("/{body}"),
        })
    }

    /// Path of a root object, `/<name>`.
    pub fn root(name: &str) -> Result<Self> {
        validate_title(name)?;
        Ok(Self {
            raw: format!("/{name}"),
        })
    }

    /// `self + "/" + title`.
    pub fn child(&self, title: &str) -> Result<Self> {
        validate_title(title)?;
        Ok(Self {
            raw: format!("{}/{title}", self.raw),
        })
    }

    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.raw.rsplit_once('/')?;
        if head.is_empty() {
            None
        } else {
            Some(Self {
                raw: head.to_string(),
            })
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw[1..].split('/')
    }

    pub fn root_segment(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }

    pub fn last_segment(&self) -> &str {
        self.raw
            .rsplit_once('/')
            .map(|(_, last)| last)
            .unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn is_child_of(&self, parent: &ObjectPath) -> bool {
        self.parent().as_ref() == Some(parent)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

/// Titles double as path segments, so they must be non-empty and must not
/// contain the separator.
pub fn validate_title(title: &str) -> Result<()> {
    if title.is_empty() || title.contains('/') {
        return Err(ModelError::InvalidTitle(title.to_string()));
    }
    Ok(())
}

/// Network binding of the runtime server that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Scheduler login node a batch system is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchedulerHost {
    pub host: String,
    pub port: u16,
}

impl SchedulerHost {
    pub const DEFAULT_PORT: u16 = 22;

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn with_default_port(host: impl Into<String>) -> Self {
        Self::new(host, Self::DEFAULT_PORT)
    }
}

impl Display for SchedulerHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
