use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidPath { path: String, reason: &'static str },
    InvalidTitle(String),
    InvalidJobState(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidPath { path, reason } => {
                write!(f, "invalid object path `{path}`: {reason}")
            }
            ModelError::InvalidTitle(title) => {
                write!(f, "invalid object title `{title}`")
            }
            ModelError::InvalidJobState(raw) => {
                write!(f, "invalid job state `{raw}`")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
