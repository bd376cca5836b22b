//! Mock submission client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::batch::UploadFile;
use crate::ingest::{IngestClient, IngestError, IngestReceipt, SubmissionResult};

use super::fixtures;

/// A recorded submission for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    /// File name that was submitted.
    pub name: String,
    /// Category form field value.
    pub category: String,
    /// Bearer credential attached to the request.
    pub credential: String,
    /// Size of the submitted payload.
    pub size_bytes: usize,
    /// When the submission was made.
    pub timestamp: Instant,
}

/// Mock implementation of the IngestClient trait.
///
/// Provides controllable behavior for testing:
/// - Script per-call outcomes (accepted, rejected, transport error)
/// - Track submissions for assertions, including scripted failures
/// - Simulate exchange latency
///
/// Scripted outcomes are consumed in FIFO order, one per call; once the
/// queue is empty every submission is accepted with a default receipt
/// echoing the submitted file and category.
#[derive(Debug)]
pub struct MockIngestClient {
    /// Scripted outcomes, consumed one per submission.
    outcomes: Arc<RwLock<VecDeque<Result<SubmissionResult, IngestError>>>>,
    /// Recorded submissions.
    submissions: Arc<RwLock<Vec<RecordedSubmission>>>,
    /// Simulated exchange latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockIngestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIngestClient {
    /// Create a new mock client that accepts everything.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(RwLock::new(VecDeque::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Script the next unscripted submission to be accepted with `receipt`.
    pub async fn queue_accepted(&self, receipt: IngestReceipt) {
        self.outcomes
            .write()
            .await
            .push_back(Ok(SubmissionResult::Accepted(receipt)));
    }

    /// Script the next unscripted submission to be rejected.
    pub async fn queue_rejected(&self, reason: &str) {
        self.outcomes
            .write()
            .await
            .push_back(Ok(SubmissionResult::Rejected {
                reason: reason.to_string(),
            }));
    }

    /// Script the next unscripted submission to fail at transport level.
    pub async fn queue_error(&self, error: IngestError) {
        self.outcomes.write().await.push_back(Err(error));
    }

    /// Simulate exchange latency on every subsequent call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded submissions.
    pub async fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.read().await.clone()
    }

    /// Get the number of submissions performed.
    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }

    /// Clear recorded submissions.
    pub async fn clear_recorded(&self) {
        self.submissions.write().await.clear();
    }

    /// Take the next scripted outcome if any.
    async fn take_outcome(&self) -> Option<Result<SubmissionResult, IngestError>> {
        self.outcomes.write().await.pop_front()
    }
}

#[async_trait]
impl IngestClient for MockIngestClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(
        &self,
        file: &UploadFile,
        category: &str,
        credential: &str,
    ) -> Result<SubmissionResult, IngestError> {
        // Record the invocation first so scripted failures count too.
        self.submissions.write().await.push(RecordedSubmission {
            name: file.name.clone(),
            category: category.to_string(),
            credential: credential.to_string(),
            size_bytes: file.bytes.len(),
            timestamp: Instant::now(),
        });

        if let Some(delay) = *self.delay.read().await {
            tokio::time::sleep(delay).await;
        }

        match self.take_outcome().await {
            Some(outcome) => outcome,
            None => Ok(SubmissionResult::Accepted(fixtures::receipt(
                &file.name, category,
            ))),
        }
    }
}
