//! Types for the document submission client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch::UploadFile;

/// Transport-level errors while reaching the ingestion service.
///
/// A service-side refusal (non-success HTTP response) is not an error
/// here; it comes back as [`SubmissionResult::Rejected`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Request timeout")]
    Timeout,

    #[error("Ingestion service connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid response from ingestion service: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Outcome of a single submission attempt that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    /// The service accepted and analyzed the document.
    Accepted(IngestReceipt),
    /// The service refused the document (unsupported format, bad
    /// category, failed validation).
    Rejected { reason: String },
}

/// Analysis receipt returned by the ingestion service on acceptance.
///
/// Mirrors the service's document payload. Analysis fields are nullable
/// on the wire; unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestReceipt {
    /// Document id assigned by the service.
    pub id: i64,
    /// File name as stored by the service.
    pub filename: String,
    /// Category the document was filed under (as submitted).
    pub department: String,
    /// Category the analysis pipeline predicts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_department: Option<String>,
    /// Prediction confidence in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Generated document summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// JSON-encoded array of alert objects, exactly as the service stores
    /// it. Decode through [`IngestReceipt::alerts`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_alerts: Option<String>,
    /// True when the predicted category contradicts the submitted one.
    #[serde(default)]
    pub is_misfiled: bool,
    /// Service-provided explanation for the misfiling flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
}

/// One semantic alert annotation attached to an analyzed document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticAlert {
    /// Alert concept name.
    pub label: String,
    /// Similarity score in [0, 1].
    pub score: f64,
}

impl IngestReceipt {
    /// Decodes the `semantic_alerts` payload.
    ///
    /// The service double-encodes alerts as a JSON string inside the JSON
    /// body. Alerts are advisory, so an undecodable payload yields an
    /// empty list rather than an error.
    pub fn alerts(&self) -> Vec<SemanticAlert> {
        self.semantic_alerts
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    /// Builds the status line for a succeeded item.
    ///
    /// Reports the predicted category and confidence, the alert count
    /// when alerts were raised, and the service's flag reason when it
    /// marked the document misfiled.
    pub fn status_line(&self) -> String {
        let predicted = self.predicted_department.as_deref().unwrap_or("unknown");
        let confidence = self.confidence.unwrap_or(0.0);
        let mut line = format!(
            "accepted as {} ({:.0}% confidence)",
            predicted,
            confidence * 100.0
        );

        let alerts = self.alerts();
        match alerts.len() {
            0 => {}
            1 => line.push_str(", 1 alert"),
            n => line.push_str(&format!(", {} alerts", n)),
        }

        if self.is_misfiled {
            match self.flag_reason.as_deref().filter(|r| !r.is_empty()) {
                Some(reason) => {
                    line.push_str("; flagged: ");
                    line.push_str(reason);
                }
                None => line.push_str("; flagged as possibly misfiled"),
            }
        }

        line
    }
}

/// Trait for document submission backends.
#[async_trait]
pub trait IngestClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Performs exactly one submission attempt for one file.
    ///
    /// `Err` is reserved for transport-level failures; a refusal from the
    /// service itself is a `Rejected` outcome. Callers must verify the
    /// credential is non-empty before invoking.
    async fn submit(
        &self,
        file: &UploadFile,
        category: &str,
        credential: &str,
    ) -> Result<SubmissionResult, IngestError>;
}
