//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock ingest backend injected, enabling comprehensive E2E testing
//! without external infrastructure.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use paperchute_core::testing::MockIngestClient;
use paperchute_core::{BatchOrchestrator, Config, IngestClient, IngestConfig, ServerConfig};

/// Re-export fixtures for test convenience
pub use paperchute_core::testing::fixtures;

/// Test fixture for E2E testing with a mock ingest backend.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_run_start() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .post_run(&[("a.pdf", b"alpha")], Some("Engineering"), Some("token"))
///         .await;
///
///     assert_eq!(response.status, StatusCode::ACCEPTED);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock ingest client - script submission outcomes
    pub ingest: Arc<MockIngestClient>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with a default mock backend.
    pub async fn new() -> Self {
        let ingest = Arc::new(MockIngestClient::new());

        let config = Config {
            server: ServerConfig::default(),
            ingest: IngestConfig {
                url: "http://127.0.0.1:1".to_string(),
                timeout_secs: 5,
                submitter: None,
            },
        };

        let orchestrator = Arc::new(BatchOrchestrator::new(
            Arc::clone(&ingest) as Arc<dyn IngestClient>
        ));

        let state = Arc::new(paperchute_server::state::AppState::new(config, orchestrator));
        let router = paperchute_server::api::create_router(state);

        Self { router, ingest }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart batch of files plus an optional department field.
    ///
    /// `token`, when present, is sent as a bearer Authorization header.
    pub async fn post_run(
        &self,
        files: &[(&str, &[u8])],
        department: Option<&str>,
        token: Option<&str>,
    ) -> TestResponse {
        let boundary = "paperchute-test-boundary";
        let body = multipart_body(files, department, boundary);

        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/runs")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            );
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = builder.body(Body::from(body)).unwrap();
        self.send(request).await
    }

    /// Poll the current run until it goes inactive; returns the final body.
    pub async fn wait_for_completion(&self, timeout: Duration) -> Value {
        let start = std::time::Instant::now();
        while start.elapsed() < timeout {
            let response = self.get("/api/v1/runs/current").await;
            if response.body["active"] == false {
                return response.body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Run did not complete within {:?}", timeout);
    }

    /// Send a request to the test server.
    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Encode files and an optional department field as a multipart form body.
fn multipart_body(files: &[(&str, &[u8])], department: Option<&str>, boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, bytes) in files {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n",
                name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(department) = department {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"department\"\r\n\r\n");
        body.extend_from_slice(department.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
