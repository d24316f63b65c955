//! JSON API over sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::presentation::SessionView;
use crate::session::{run_analysis, SessionHandle};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub cv_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

pub(crate) async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    guard.touch();
    Ok(Json(SessionView::from_session(&guard)))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Runs the analysis to completion and returns the settled session.
/// Empty input is a 400 and a submit while one is running is a 409; neither
/// changes the session's state.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    run_analysis(
        session.clone(),
        state.analyzer.clone(),
        request.cv_text,
        request.job_description,
    )
    .await?;

    let guard = session.lock().await;
    Ok(Json(SessionView::from_session(&guard)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}
