//! Batch run API handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use paperchute_core::{OrchestratorError, RunProgress, UploadFile, UploadItem};
use serde::Serialize;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartRunResponse {
    pub run_id: String,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct RunProgressResponse {
    pub run_id: String,
    pub active: bool,
    pub complete: bool,
    pub success_count: usize,
    pub attempted_count: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub items: Vec<UploadItem>,
}

impl From<RunProgress> for RunProgressResponse {
    fn from(progress: RunProgress) -> Self {
        let complete = progress.is_complete();
        Self {
            run_id: progress.run_id,
            active: progress.active,
            complete,
            success_count: progress.success_count,
            attempted_count: progress.attempted_count,
            total: progress.total,
            started_at: progress.started_at,
            items: progress.items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/runs
///
/// Start a batch submission run from a multipart upload. The form carries
/// repeated `files` parts plus a `department` text field; the bearer token
/// is forwarded to the ingestion service with every submission.
pub async fn start_run(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StartRunResponse>), (StatusCode, Json<ErrorResponse>)> {
    let credential = bearer_token(&headers).unwrap_or_default();

    let mut files: Vec<UploadFile> = Vec::new();
    let mut department: Option<String> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "files" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("file-{}", files.len() + 1));
                match field.bytes().await {
                    Ok(bytes) => files.push(UploadFile::new(file_name, bytes.to_vec())),
                    Err(e) => {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponse {
                                error: format!("Failed to read file: {}", e),
                            }),
                        ))
                    }
                }
            }
            "department" => {
                if let Ok(text) = field.text().await {
                    if !text.is_empty() {
                        department = Some(text);
                    }
                }
            }
            _ => {}
        }
    }

    let department = match department {
        Some(d) => d,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No department provided".to_string(),
                }),
            ))
        }
    };

    match state
        .orchestrator()
        .start_run(files, &department, &credential)
        .await
    {
        Ok(handle) => {
            let progress = handle.progress().await;
            Ok((
                StatusCode::ACCEPTED,
                Json(StartRunResponse {
                    run_id: progress.run_id,
                    total: progress.total,
                }),
            ))
        }
        Err(e @ OrchestratorError::PreconditionFailed(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e @ OrchestratorError::RunActive) => Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// GET /api/v1/runs/current
///
/// Progress of the most recent batch run.
pub async fn current_run(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RunProgressResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.orchestrator().progress().await {
        Some(progress) => Ok(Json(RunProgressResponse::from(progress))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No batch run has been started".to_string(),
            }),
        )),
    }
}

/// GET /api/v1/runs/{id}
///
/// Progress of a specific run. Only the most recent run is retained, so
/// ids of replaced runs return 404.
pub async fn get_run(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RunProgressResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.orchestrator().progress().await {
        Some(progress) if progress.run_id == id => Ok(Json(RunProgressResponse::from(progress))),
        _ => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Run not found: {}", id),
            }),
        )),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}
