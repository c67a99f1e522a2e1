//! Execution status shared by runners and their commands
//!
//! The master reports a runner's status as the highest status of any of its
//! commands, so the numeric order below is meaningful to the backend.

use serde::{Deserialize, Serialize};

/// Status of a runner or of a single command step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Status {
    /// Not started yet
    #[default]
    NotStart,

    /// Finished successfully
    Success,

    /// Currently executing
    Ongoing,

    /// Waiting for a worker
    Pending,

    /// Finished with an error
    Failure,

    /// Cancelled by a user
    Cancel,

    /// Interrupted (worker lost, master restart)
    Interrupt,

    /// A code this client does not know about
    ///
    /// Only produced by decoding; build statuses through `Status::from(u8)`
    /// so a known code never ends up here.
    Other(u8),
}

impl Status {
    /// Whether the step may still change: log polling continues and the
    /// runner can be cancelled.
    pub fn is_active(self) -> bool {
        matches!(self, Status::Ongoing | Status::Pending)
    }

    /// Whether the step reached a final outcome
    pub fn is_completed(self) -> bool {
        matches!(self, Status::Success | Status::Failure | Status::Cancel)
    }

    /// Numeric wire code
    pub fn code(self) -> u8 {
        self.into()
    }
}

impl From<u8> for Status {
    fn from(code: u8) -> Self {
        match code {
            0 => Status::NotStart,
            1 => Status::Success,
            2 => Status::Ongoing,
            3 => Status::Pending,
            4 => Status::Failure,
            5 => Status::Cancel,
            6 => Status::Interrupt,
            other => Status::Other(other),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        match status {
            Status::NotStart => 0,
            Status::Success => 1,
            Status::Ongoing => 2,
            Status::Pending => 3,
            Status::Failure => 4,
            Status::Cancel => 5,
            Status::Interrupt => 6,
            Status::Other(code) => code,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::NotStart => write!(f, "not started"),
            Status::Success => write!(f, "success"),
            Status::Ongoing => write!(f, "ongoing"),
            Status::Pending => write!(f, "pending"),
            Status::Failure => write!(f, "failure"),
            Status::Cancel => write!(f, "cancelled"),
            Status::Interrupt => write!(f, "interrupted"),
            Status::Other(code) => write!(f, "unknown({})", code),
        }
    }
}
