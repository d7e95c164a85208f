//! API handlers for the simplification server
//!
//! Provides REST endpoints for:
//! - Session lifecycle (upload, inspect, delete)
//! - Initial simplification and iterative edits
//! - Artifact regeneration and downloads

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use simplify_core::{ContractSession, EditOutcome, EditRequest, Section, SimplifyError};
use tokio::sync::MutexGuard;
use tracing::{debug, info};

use crate::error::ServerError;
use crate::state::{AppState, SharedSession};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "simplify-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Upload request body
#[derive(Deserialize)]
pub struct CreateSessionRequest {
    /// Original file name; its extension selects the extractor
    pub filename: String,
    /// File bytes, base64-encoded
    pub content_base64: String,
}

/// Session state as seen by clients
#[derive(Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub filename: String,
    pub revision: u64,
    pub simplified: bool,
    pub artifacts_fresh: bool,
    pub source_chars: usize,
    pub sections: Vec<Section>,
}

impl SessionSummary {
    fn new(id: &str, session: &ContractSession) -> Self {
        Self {
            id: id.to_string(),
            filename: session.source_label().to_string(),
            revision: session.revision(),
            simplified: session.is_simplified(),
            artifacts_fresh: session.has_fresh_artifacts(),
            source_chars: session.source_text().chars().count(),
            sections: session.sections().to_vec(),
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: SessionSummary,
}

#[derive(Serialize)]
pub struct OperationResponse {
    pub success: bool,
    pub outcome: EditOutcome,
    pub session: SessionSummary,
}

#[derive(Serialize)]
pub struct SourceResponse {
    pub success: bool,
    pub filename: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: String,
}

/// Edit request body
#[derive(Deserialize)]
pub struct InstructionRequest {
    pub instruction: String,
}

/// Handler: POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ServerError> {
    info!("Upload: filename={}", req.filename);

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(req.content_base64.trim())
        .map_err(|e| ServerError::InvalidRequest(format!("content_base64: {}", e)))?;
    debug!("Decoded {} upload bytes", bytes.len());

    let session = ContractSession::from_upload(&req.filename, &bytes)?;
    let summary_source = session.clone();
    let id = state.sessions.insert(session).await;

    info!("Created session {} for {}", id, req.filename);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            success: true,
            session: SessionSummary::new(&id, &summary_source),
        }),
    ))
}

/// Handler: GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ServerError> {
    let shared = state.sessions.get(&id).await?;
    let session = shared.lock().await;

    Ok(Json(SessionResponse {
        success: true,
        session: SessionSummary::new(&id, &session),
    }))
}

/// Handler: DELETE /api/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ServerError> {
    state.sessions.remove(&id).await?;
    info!("Deleted session {}", id);

    Ok(Json(DeleteResponse { success: true, id }))
}

/// Handler: GET /api/sessions/:id/source
pub async fn handle_get_source(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SourceResponse>, ServerError> {
    let shared = state.sessions.get(&id).await?;
    let session = shared.lock().await;

    Ok(Json(SourceResponse {
        success: true,
        filename: session.source_label().to_string(),
        text: session.source_text().to_string(),
    }))
}

/// Handler: POST /api/sessions/:id/simplify
pub async fn handle_simplify(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OperationResponse>, ServerError> {
    let shared = state.sessions.get(&id).await?;
    let mut session = lock_for_write(&shared)?;

    let outcome = state.simplifier.ingest(&mut session).await?;
    Ok(operation_response(&id, outcome, &session))
}

/// Handler: POST /api/sessions/:id/sections/:index/edit
pub async fn handle_edit_section(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Json(req): Json<InstructionRequest>,
) -> Result<Json<OperationResponse>, ServerError> {
    apply_edit(&state, &id, EditRequest::section(index, req.instruction)).await
}

/// Handler: POST /api/sessions/:id/edit
pub async fn handle_edit_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<InstructionRequest>,
) -> Result<Json<OperationResponse>, ServerError> {
    apply_edit(&state, &id, EditRequest::document(req.instruction)).await
}

/// Handler: POST /api/sessions/:id/artifacts
pub async fn handle_regenerate_artifacts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ServerError> {
    let shared = state.sessions.get(&id).await?;
    let mut session = lock_for_write(&shared)?;

    let revision = state.simplifier.regenerate_artifacts(&mut session).await?;
    info!("Regenerated artifacts for session {} at revision {}", id, revision);

    Ok(Json(SessionResponse {
        success: true,
        session: SessionSummary::new(&id, &session),
    }))
}

/// Handler: GET /api/sessions/:id/download/:format
pub async fn handle_download(
    State(state): State<AppState>,
    Path((id, format)): Path<(String, String)>,
) -> Result<Response, ServerError> {
    let shared = state.sessions.get(&id).await?;
    let session = shared.lock().await;

    let (content_type, body): (&str, Vec<u8>) = match format.as_str() {
        "json" => {
            let document = session.document().ok_or(SimplifyError::NoDocument)?;
            let json = document
                .to_json_pretty()
                .map_err(|e| ServerError::Internal(e.to_string()))?;
            ("application/json", json.into_bytes())
        }
        "html" | "pdf" => {
            if !session.is_simplified() {
                return Err(SimplifyError::NoDocument.into());
            }
            let artifacts = session.artifacts().ok_or(ServerError::ArtifactsStale)?;
            if format == "html" {
                ("text/html; charset=utf-8", artifacts.html.clone().into_bytes())
            } else {
                ("application/pdf", artifacts.pdf.clone())
            }
        }
        other => {
            return Err(ServerError::InvalidRequest(format!(
                "unknown download format '{}'; use json, html or pdf",
                other
            )))
        }
    };

    let file_name = session.download_name(&format).replace('"', "'");
    debug!("Download {} for session {}", file_name, id);

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

async fn apply_edit(
    state: &AppState,
    id: &str,
    request: EditRequest,
) -> Result<Json<OperationResponse>, ServerError> {
    info!("{} on session {}", request.kind(), id);

    let shared = state.sessions.get(id).await?;
    let mut session = lock_for_write(&shared)?;

    let outcome = state.simplifier.apply(&mut session, &request).await?;
    Ok(operation_response(id, outcome, &session))
}

/// Writers never queue behind each other; a busy session is a conflict
fn lock_for_write(shared: &SharedSession) -> Result<MutexGuard<'_, ContractSession>, ServerError> {
    shared.try_lock().map_err(|_| ServerError::EditInProgress)
}

fn operation_response(
    id: &str,
    outcome: EditOutcome,
    session: &ContractSession,
) -> Json<OperationResponse> {
    Json(OperationResponse {
        success: true,
        outcome,
        session: SessionSummary::new(id, session),
    })
}
