//! Operation domain types
//!
//! An operation is a server-side asynchronous analysis job. The server
//! encodes its status as an integer on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Server-tracked asynchronous operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub uuid: Uuid,
    pub status: OperationStatus,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub date: Option<chrono::DateTime<chrono::Utc>>,
}

impl Operation {
    /// Diagnostic lines for a failed operation: server messages first, then the error text
    pub fn diagnostics(&self) -> Vec<String> {
        let mut lines = self.messages.clone();
        if let Some(error) = self.error.as_ref().filter(|e| !e.is_empty()) {
            lines.push(error.clone());
        }
        lines
    }
}

/// Operation status
///
/// Progresses monotonically: Pending -> Processing -> {Done, Error}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OperationStatus {
    Pending,
    Processing,
    Done,
    Error,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Done | OperationStatus::Error)
    }

    /// Whether moving from `self` to `next` respects the lifecycle order
    pub fn can_transition_to(&self, next: OperationStatus) -> bool {
        if self.is_terminal() {
            return *self == next;
        }
        next >= *self
    }
}

impl TryFrom<u8> for OperationStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(OperationStatus::Pending),
            1 => Ok(OperationStatus::Processing),
            2 => Ok(OperationStatus::Done),
            3 => Ok(OperationStatus::Error),
            other => Err(format!("unknown operation status {}", other)),
        }
    }
}

impl From<OperationStatus> for u8 {
    fn from(status: OperationStatus) -> Self {
        match status {
            OperationStatus::Pending => 0,
            OperationStatus::Processing => 1,
            OperationStatus::Done => 2,
            OperationStatus::Error => 3,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationStatus::Pending => "pending",
            OperationStatus::Processing => "processing",
            OperationStatus::Done => "done",
            OperationStatus::Error => "error",
        };
        f.write_str(s)
    }
}
