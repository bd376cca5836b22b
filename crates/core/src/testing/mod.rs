//! Testing utilities and mock implementations.
//!
//! This module provides a mock submission backend so orchestrator and
//! server behavior can be tested end to end without a live ingestion
//! service.
//!
//! # Example
//!
//! ```rust,ignore
//! use paperchute_core::testing::{fixtures, MockIngestClient};
//!
//! let client = MockIngestClient::new();
//!
//! // Script outcomes for the first two submissions; later ones succeed
//! // with a default receipt.
//! client.queue_rejected("unsupported format").await;
//! client.queue_error(IngestError::Timeout).await;
//!
//! // Use in a BatchOrchestrator...
//! ```

mod mock_ingest;

pub use mock_ingest::{MockIngestClient, RecordedSubmission};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::batch::UploadFile;
    use crate::ingest::IngestReceipt;

    /// Create a small test file with deterministic contents.
    pub fn upload_file(name: &str) -> UploadFile {
        UploadFile::new(name, format!("contents of {}", name).into_bytes())
    }

    /// Create an ingestion receipt with reasonable defaults.
    ///
    /// The prediction agrees with the submitted department, so the receipt
    /// reads as a clean acceptance.
    pub fn receipt(filename: &str, department: &str) -> IngestReceipt {
        IngestReceipt {
            id: 1,
            filename: filename.to_string(),
            department: department.to_string(),
            predicted_department: Some(department.to_string()),
            confidence: Some(0.95),
            summary: Some(format!("Summary of {}.", filename)),
            semantic_alerts: Some("[]".to_string()),
            is_misfiled: false,
            flag_reason: None,
        }
    }

    /// Create a receipt the service flagged as misfiled.
    pub fn misfiled_receipt(filename: &str, department: &str, predicted: &str) -> IngestReceipt {
        let mut receipt = receipt(filename, department);
        receipt.predicted_department = Some(predicted.to_string());
        receipt.is_misfiled = true;
        receipt.flag_reason = Some(format!(
            "Document semantically matches \"{}\" but filed under \"{}\"",
            predicted, department
        ));
        receipt
    }
}
