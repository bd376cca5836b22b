pub mod batch;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod orchestrator;
pub mod testing;

pub use batch::{
    BatchError, BatchRun, ItemStatus, RunProgress, UploadFile, UploadItem,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, IngestConfig,
    ServerConfig,
};
pub use ingest::{
    HttpIngestClient, IngestClient, IngestError, IngestReceipt, SemanticAlert, SubmissionResult,
};
pub use orchestrator::{BatchOrchestrator, OrchestratorError, RunHandle};
