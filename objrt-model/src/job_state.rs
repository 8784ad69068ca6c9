use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ModelError;

/// Execution state of a scheduler job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Running,
    Suspended,
    Completing,
    Completed,
    Cancelled,
    Failed,
    Timeout,
    NodeFail,
    Preempted,
    OutOfMemory,
    /// The listing that produced the job did not report a state.
    Unknown,
    /// Any state name this build does not know about, kept verbatim.
    Other(String),
}

impl JobState {
    /// Canonical upper-case scheduler name.
    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Suspended => "SUSPENDED",
            JobState::Completing => "COMPLETING",
            JobState::Completed => "COMPLETED",
            JobState::Cancelled => "CANCELLED",
            JobState::Failed => "FAILED",
            JobState::Timeout => "TIMEOUT",
            JobState::NodeFail => "NODE_FAIL",
            JobState::Preempted => "PREEMPTED",
            JobState::OutOfMemory => "OUT_OF_MEMORY",
            JobState::Unknown => "UNKNOWN",
            JobState::Other(raw) => raw,
        }
    }
}

impl Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobState {
    type Err = ModelError;

    /// Accepts long names and the two/three letter codes printed by
    /// `squeue -t`. `scontrol` reports cancellations as `CANCELLED by
    /// <uid>`; only the first word is significant.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let word = raw.split_whitespace().next().unwrap_or_default();
        if word.is_empty() {
            return Err(ModelError::InvalidJobState(raw.to_string()));
        }

        let state = match word.to_ascii_uppercase().as_str() {
            "PENDING" | "PD" => JobState::Pending,
            "RUNNING" | "R" => JobState::Running,
            "SUSPENDED" | "S" => JobState::Suspended,
            "COMPLETING" | "CG" => JobState::Completing,
            "COMPLETED" | "CD" => JobState::Completed,
            "CANCELLED" | "CA" => JobState::Cancelled,
            "FAILED" | "F" => JobState::Failed,
            "TIMEOUT" | "TO" => JobState::Timeout,
            "NODE_FAIL" | "NF" => JobState::NodeFail,
            "PREEMPTED" | "PR" => JobState::Preempted,
            "OUT_OF_MEMORY" | "OOM" => JobState::OutOfMemory,
            "UNKNOWN" => JobState::Unknown,
            _ => JobState::Other(word.to_string()),
        };
        Ok(state)
    }
}
