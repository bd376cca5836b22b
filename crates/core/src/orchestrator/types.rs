//! Types for the batch orchestrator.

use thiserror::Error;

/// Errors that can occur when starting a batch run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A start precondition was not met; no run was created.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The previous run is still in flight.
    #[error("a batch run is already active")]
    RunActive,

    /// Batch record error.
    #[error("batch error: {0}")]
    Batch(#[from] crate::batch::BatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchError;

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::PreconditionFailed("credential is required".to_string());
        assert_eq!(
            err.to_string(),
            "precondition failed: credential is required"
        );

        assert_eq!(
            OrchestratorError::RunActive.to_string(),
            "a batch run is already active"
        );
    }

    #[test]
    fn test_batch_error_conversion() {
        let err: OrchestratorError = BatchError::EmptyBatch.into();
        assert!(matches!(err, OrchestratorError::Batch(_)));
        assert_eq!(err.to_string(), "batch error: Batch contains no files");
    }
}
