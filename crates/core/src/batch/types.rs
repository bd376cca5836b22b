//! Core batch data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a single item within a batch run.
///
/// Items start `Pending`, move to `Processing` when their submission
/// begins, and end in exactly one terminal state. Terminal items never
/// transition again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Queued, submission not started.
    Pending,
    /// Submission in flight.
    Processing,
    /// Ingestion service accepted the document.
    Succeeded,
    /// Submission failed (service rejection or transport error).
    Failed,
}

impl ItemStatus {
    /// Returns true once no further transitions may occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Succeeded | ItemStatus::Failed)
    }

    /// Returns the status as a lowercase label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Succeeded => "succeeded",
            ItemStatus::Failed => "failed",
        }
    }
}

/// Per-file status record within a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadItem {
    /// Stable index within the batch, assigned at creation.
    pub id: usize,
    /// Display name (the submitted file name), immutable.
    pub name: String,
    /// Current lifecycle state.
    pub status: ItemStatus,
    /// Human-readable outcome detail, rewritten on every transition.
    pub message: String,
}

/// A file queued for submission: display name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name as presented to the ingestion service.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Read-only aggregate view of a run.
///
/// Cloned out of the live run under a read lock; safe to hold, serialize,
/// and compare. Observers may see a stale snapshot between transitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunProgress {
    /// Unique id of the run this snapshot describes.
    pub run_id: String,
    /// True while the submission loop is still working.
    pub active: bool,
    /// Items that reached `Succeeded`.
    pub success_count: usize,
    /// Items that left `Pending` (their submission was started).
    pub attempted_count: usize,
    /// Total items in the batch.
    pub total: usize,
    /// When the run was started.
    pub started_at: DateTime<Utc>,
    /// Every item in submission order.
    pub items: Vec<UploadItem>,
}

impl RunProgress {
    /// True once the loop has stopped and every item has been attempted.
    ///
    /// A partially failed batch still counts as complete; only the
    /// attempted count matters, not the success count.
    pub fn is_complete(&self) -> bool {
        !self.active && self.attempted_count == self.total
    }
}
