//! Batch orchestrator for sequential document submission.
//!
//! The orchestrator drives a batch run to completion automatically:
//! - **Submission**: Sequential (one item at a time) - bounds load on the
//!   analysis service, which performs expensive per-document inference
//! - **Observation**: read-only progress snapshots, polled at will

mod runner;
mod types;

pub use runner::{BatchOrchestrator, RunHandle};
pub use types::OrchestratorError;
