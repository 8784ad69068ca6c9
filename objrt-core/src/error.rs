use std::fmt::{self, Display};

use thiserror::Error;

use crate::cluster::ClusterQueryFailure;
use crate::protocol::frame::FrameError;

/// Category of a runtime failure, as carried in the error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Protocol,
    NotFound,
    ClusterQuery,
    Serialization,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Protocol => "protocol",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ClusterQuery => "cluster_query",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Internal => "internal",
        }
    }

    /// Inverse of [`ErrorKind::as_str`]; unrecognised names map to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "transport" => Some(ErrorKind::Transport),
            "protocol" => Some(ErrorKind::Protocol),
            "not_found" => Some(ErrorKind::NotFound),
            "cluster_query" => Some(ErrorKind::ClusterQuery),
            "serialization" => Some(ErrorKind::Serialization),
            "internal" => Some(ErrorKind::Internal),
            _ => None,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("transport error: {0}")]
    Transport(#[from] FrameError),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    ClusterQuery(#[from] ClusterQueryFailure),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// Failure reported by a runtime server through an error envelope. The
    /// message is the server's text, unmodified.
    #[error("{message}")]
    Remote { kind: ErrorKind, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Transport(_) => ErrorKind::Transport,
            RuntimeError::Protocol(_) => ErrorKind::Protocol,
            RuntimeError::NotFound(_) => ErrorKind::NotFound,
            RuntimeError::ClusterQuery(_) => ErrorKind::ClusterQuery,
            RuntimeError::Serialization(_) => ErrorKind::Serialization,
            RuntimeError::Remote { kind, .. } => *kind,
            RuntimeError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn not_found(path: impl Display) -> Self {
        RuntimeError::NotFound(path.to_string())
    }
}

impl From<serde_json::Error> for RuntimeError {
    fn from(err: serde_json::Error) -> Self {
        RuntimeError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
