//! Submission client for the document ingestion service.
//!
//! One trait seam ([`IngestClient`]) with one production implementation
//! ([`HttpIngestClient`]) that performs a single multipart exchange per
//! item. No retries and no credential refresh: every call is exactly one
//! attempt whose outcome is classified for the orchestrator.

mod http;
mod types;

pub use http::HttpIngestClient;
pub use types::{IngestClient, IngestError, IngestReceipt, SemanticAlert, SubmissionResult};
