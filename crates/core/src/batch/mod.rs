//! Per-item state tracking for batch submission runs.
//!
//! A [`BatchRun`] owns one [`UploadItem`] record per selected file and
//! enforces the item state machine:
//! `Pending -> Processing -> {Succeeded | Failed}`. Terminal states are
//! final; the run itself becomes immutable once inactive.

mod run;
mod types;

pub use run::{BatchError, BatchRun};
pub use types::{ItemStatus, RunProgress, UploadFile, UploadItem};
