//! Batch orchestrator implementation.
//!
//! Drives one batch run at a time through the item state machine:
//! - Submission: strictly sequential (one item in flight at a time)
//! - Failure isolation: a failed item never halts the remaining items
//! - Observation: read-only progress snapshots at any point

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};

use crate::batch::{BatchError, BatchRun, ItemStatus, RunProgress, UploadFile};
use crate::ingest::{IngestClient, SubmissionResult};
use crate::metrics;

use super::types::OrchestratorError;

/// Read-only handle to a batch run.
///
/// Cheap to clone. Observers use it to poll progress or await completion;
/// the run itself is mutated only by the orchestrator's worker task.
#[derive(Clone)]
pub struct RunHandle {
    run: Arc<RwLock<BatchRun>>,
    done: watch::Receiver<bool>,
}

impl RunHandle {
    /// Id of the run this handle observes.
    pub async fn id(&self) -> String {
        self.run.read().await.id().to_string()
    }

    /// Snapshot of the run at this instant.
    pub async fn progress(&self) -> RunProgress {
        self.run.read().await.progress()
    }

    /// Waits until the run has finished, i.e. every item is terminal.
    ///
    /// Returns immediately if the run already finished.
    pub async fn wait(&self) {
        let mut done = self.done.clone();
        while !*done.borrow() {
            if done.changed().await.is_err() {
                break;
            }
        }
    }
}

/// The batch orchestrator - drives document batches through submission.
pub struct BatchOrchestrator {
    client: Arc<dyn IngestClient>,
    current: RwLock<Option<RunHandle>>,
}

impl BatchOrchestrator {
    /// Create a new orchestrator over a submission backend.
    pub fn new(client: Arc<dyn IngestClient>) -> Self {
        Self {
            client,
            current: RwLock::new(None),
        }
    }

    /// Start a new batch run.
    ///
    /// Preconditions: non-empty credential, non-empty file list, and no
    /// run currently in flight. When they hold, the run is created with
    /// every item `Pending` and a worker task starts driving it; the
    /// returned handle observes that run. A finished previous run is
    /// replaced, never appended to.
    pub async fn start_run(
        &self,
        files: Vec<UploadFile>,
        category: &str,
        credential: &str,
    ) -> Result<RunHandle, OrchestratorError> {
        if credential.is_empty() {
            return Err(OrchestratorError::PreconditionFailed(
                "credential is required".to_string(),
            ));
        }
        if files.is_empty() {
            return Err(OrchestratorError::PreconditionFailed(
                "no files selected".to_string(),
            ));
        }

        // Hold the write lock across the active check and the swap so two
        // concurrent starts cannot both pass the guard.
        let mut current = self.current.write().await;
        if let Some(handle) = current.as_ref() {
            if handle.progress().await.active {
                return Err(OrchestratorError::RunActive);
            }
        }

        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        let run = BatchRun::new(&names, category)?;

        info!(
            run_id = %run.id(),
            total = run.total(),
            category = category,
            "Starting batch run"
        );
        metrics::RUNS_STARTED.inc();

        let run = Arc::new(RwLock::new(run));
        let (done_tx, done_rx) = watch::channel(false);
        let handle = RunHandle {
            run: Arc::clone(&run),
            done: done_rx,
        };
        *current = Some(handle.clone());
        drop(current);

        let client = Arc::clone(&self.client);
        let category = category.to_string();
        let credential = credential.to_string();
        tokio::spawn(async move {
            Self::process_batch(client, run, files, category, credential).await;
            let _ = done_tx.send(true);
        });

        Ok(handle)
    }

    /// Handle to the most recent run, if any was started.
    pub async fn current_run(&self) -> Option<RunHandle> {
        self.current.read().await.clone()
    }

    /// Progress of the most recent run, if any was started.
    pub async fn progress(&self) -> Option<RunProgress> {
        match self.current.read().await.as_ref() {
            Some(handle) => Some(handle.progress().await),
            None => None,
        }
    }

    /// Drives every item of one run to a terminal state, in order.
    ///
    /// Exactly one submission is in flight at any time; the loop suspends
    /// on the network exchange and never starts item i+1 before item i is
    /// terminal. There is no mid-run abort.
    async fn process_batch(
        client: Arc<dyn IngestClient>,
        run: Arc<RwLock<BatchRun>>,
        files: Vec<UploadFile>,
        category: String,
        credential: String,
    ) {
        for (item_id, file) in files.iter().enumerate() {
            let step =
                Self::process_item(&client, &run, item_id, file, &category, &credential).await;
            if let Err(e) = step {
                // Only record-level errors land here (unknown item id or a
                // terminal item asked to move again). Both mean the run
                // record and this loop disagree about state.
                error!(
                    item_id = item_id,
                    error = %e,
                    "Batch run aborted on internal state error"
                );
                run.write().await.finish();
                return;
            }
        }

        let mut run = run.write().await;
        run.finish();
        let progress = run.progress();
        info!(
            run_id = %progress.run_id,
            succeeded = progress.success_count,
            attempted = progress.attempted_count,
            total = progress.total,
            "Batch run finished"
        );
        metrics::RUNS_COMPLETED.inc();
    }

    /// Submits one item and records its terminal outcome.
    ///
    /// Service rejections and transport failures both terminate the item
    /// as `Failed` with a classified message; they are not errors of this
    /// function. `Err` is reserved for batch record violations.
    async fn process_item(
        client: &Arc<dyn IngestClient>,
        run: &Arc<RwLock<BatchRun>>,
        item_id: usize,
        file: &UploadFile,
        category: &str,
        credential: &str,
    ) -> Result<(), BatchError> {
        run.write()
            .await
            .transition(item_id, ItemStatus::Processing, "submitting")?;

        let started = Instant::now();
        let outcome = client.submit(file, category, credential).await;
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(SubmissionResult::Accepted(receipt)) => {
                metrics::ITEMS_SUBMITTED
                    .with_label_values(&["accepted"])
                    .inc();
                metrics::SUBMISSION_DURATION
                    .with_label_values(&["accepted"])
                    .observe(elapsed);
                debug!(file = %file.name, document_id = receipt.id, "Item accepted");
                run.write()
                    .await
                    .transition(item_id, ItemStatus::Succeeded, receipt.status_line())?;
            }
            Ok(SubmissionResult::Rejected { reason }) => {
                metrics::ITEMS_SUBMITTED
                    .with_label_values(&["rejected"])
                    .inc();
                metrics::SUBMISSION_DURATION
                    .with_label_values(&["rejected"])
                    .observe(elapsed);
                warn!(file = %file.name, reason = %reason, "Item rejected by ingestion service");
                run.write().await.transition(
                    item_id,
                    ItemStatus::Failed,
                    format!("failed: {}", reason),
                )?;
            }
            Err(e) => {
                metrics::ITEMS_SUBMITTED
                    .with_label_values(&["transport_error"])
                    .inc();
                metrics::SUBMISSION_DURATION
                    .with_label_values(&["transport_error"])
                    .observe(elapsed);
                warn!(file = %file.name, error = %e, "Item submission failed");
                run.write().await.transition(
                    item_id,
                    ItemStatus::Failed,
                    format!("failed: {}", e),
                )?;
            }
        }

        Ok(())
    }
}
