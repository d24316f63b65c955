//! HTML pages. Form posts use post/redirect/get so a reload never resubmits.

use anyhow::Context;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::presentation::{html::SessionPage, SessionView};
use crate::routes::sessions::find_session;
use crate::session::{run_analysis, RunError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub cv_text: String,
    #[serde(default)]
    pub job_description: String,
}

fn session_path(id: Uuid) -> String {
    format!("/sessions/{id}")
}

/// GET /
/// Starts a fresh session.
pub async fn handle_index(State(state): State<AppState>) -> Redirect {
    let id = state.sessions.create().await;
    Redirect::to(&session_path(id))
}

/// GET /sessions/:id
/// Unknown or expired sessions start over.
pub async fn handle_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(session) = state.sessions.get(id).await else {
        debug!("Session {id} not found, starting a new one");
        return Ok(Redirect::to("/").into_response());
    };
    let view = {
        let mut guard = session.lock().await;
        guard.touch();
        SessionView::from_session(&guard)
    };
    let html = SessionPage::new(&view)
        .render()
        .context("Failed to render session page")?;
    Ok(Html(html).into_response())
}

/// POST /sessions/:id/analyze
/// A refused submit is recorded on the session and shown after the redirect.
pub async fn handle_analyze_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Redirect, AppError> {
    let session = find_session(&state, id).await?;
    match run_analysis(
        session,
        state.analyzer.clone(),
        form.cv_text,
        form.job_description,
    )
    .await
    {
        Ok(_) => {}
        Err(RunError::Refused(refused)) => debug!("Session {id}: submit refused: {refused}"),
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to(&session_path(id)))
}
