//! HTTP submission backend implementation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::batch::UploadFile;
use crate::config::IngestConfig;

use super::{IngestClient, IngestError, IngestReceipt, SubmissionResult};

/// Submission client backed by the ingestion service's REST API.
pub struct HttpIngestClient {
    client: Client,
    config: IngestConfig,
}

impl HttpIngestClient {
    /// Create a new HttpIngestClient with the given configuration.
    pub fn new(config: IngestConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }
}

#[async_trait]
impl IngestClient for HttpIngestClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn submit(
        &self,
        file: &UploadFile,
        category: &str,
        credential: &str,
    ) -> Result<SubmissionResult, IngestError> {
        let url = upload_url(&self.config.url);
        debug!(file = %file.name, category = category, "Submitting document");

        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let mut form = Form::new()
            .part("file", part)
            .text("department", category.to_string());
        if let Some(submitter) = &self.config.submitter {
            form = form.text("uploaded_by", submitter.clone());
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IngestError::Timeout
                } else if e.is_connect() {
                    IngestError::ConnectionFailed(e.to_string())
                } else {
                    IngestError::Internal(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let reason = rejection_reason(status, &body);
            debug!(file = %file.name, status = %status, reason = %reason, "Submission rejected");
            return Ok(SubmissionResult::Rejected { reason });
        }

        let receipt: IngestReceipt = response
            .json()
            .await
            .map_err(|e| IngestError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        debug!(
            file = %file.name,
            document_id = receipt.id,
            "Submission accepted"
        );

        Ok(SubmissionResult::Accepted(receipt))
    }
}

/// Build the upload endpoint URL from the configured base.
fn upload_url(base: &str) -> String {
    format!("{}/documents/upload", base.trim_end_matches('/'))
}

/// Derive a human-readable rejection reason from an error response.
///
/// Prefers the service's JSON `detail` field, then the raw body
/// (truncated), then the bare HTTP status.
fn rejection_reason(status: StatusCode, body: &str) -> String {
    if let Some(detail) = extract_detail(body) {
        return detail;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!(
            "HTTP {}: {}",
            status,
            trimmed.chars().take(200).collect::<String>()
        )
    }
}

/// Pull the `detail` field out of a service error body, if present.
///
/// FastAPI-style services put a string there for handled errors and a
/// structured list for validation errors; both are surfaced.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url() {
        assert_eq!(
            upload_url("http://localhost:8000"),
            "http://localhost:8000/documents/upload"
        );
    }

    #[test]
    fn test_upload_url_trims_trailing_slash() {
        assert_eq!(
            upload_url("http://localhost:8000/"),
            "http://localhost:8000/documents/upload"
        );
    }

    #[test]
    fn test_extract_detail_string() {
        let detail = extract_detail(r#"{"detail": "Unsupported file type"}"#);
        assert_eq!(detail, Some("Unsupported file type".to_string()));
    }

    #[test]
    fn test_extract_detail_structured() {
        let detail = extract_detail(r#"{"detail": [{"loc": ["body", "department"], "msg": "field required"}]}"#);
        assert!(detail.unwrap().contains("field required"));
    }

    #[test]
    fn test_extract_detail_absent() {
        assert_eq!(extract_detail(r#"{"error": "nope"}"#), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn test_rejection_reason_prefers_detail() {
        let reason = rejection_reason(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            r#"{"detail": "unsupported format"}"#,
        );
        assert_eq!(reason, "unsupported format");
    }

    #[test]
    fn test_rejection_reason_falls_back_to_body() {
        let reason = rejection_reason(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert!(reason.contains("502"));
        assert!(reason.contains("upstream exploded"));
    }

    #[test]
    fn test_rejection_reason_truncates_long_bodies() {
        let body = "x".repeat(500);
        let reason = rejection_reason(StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert!(reason.len() < 250);
    }

    #[test]
    fn test_rejection_reason_empty_body() {
        let reason = rejection_reason(StatusCode::UNAUTHORIZED, "");
        assert_eq!(reason, "HTTP 401 Unauthorized");
    }

    #[test]
    fn test_client_construction() {
        let config = IngestConfig {
            url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            submitter: None,
        };
        let client = HttpIngestClient::new(config);
        assert_eq!(client.name(), "http");
    }
}
