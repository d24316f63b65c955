//! Presentation surface — a snapshot of one session, ready to render.
//!
//! `SessionView` is what the JSON API returns and what the HTML page is
//! rendered from. It holds no behavior beyond copying out of the session.

use serde::Serialize;
use uuid::Uuid;

use crate::lifecycle::ErrorMessage;
use crate::projection::{project, ReportView};
use crate::report::MatchReport;
use crate::session::Session;

pub mod html;

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub state: &'static str,
    pub cv_text: String,
    pub job_description: String,
    pub can_submit: bool,
    pub notice: Option<String>,
    pub error: Option<ErrorMessage>,
    pub report: Option<MatchReport>,
    pub view: Option<ReportView>,
}

impl SessionView {
    pub fn from_session(session: &Session) -> Self {
        let report = session.lifecycle.report().cloned();
        let view = report.as_ref().map(project);

        Self {
            session_id: session.id,
            state: session.lifecycle.state().name(),
            cv_text: session.cv_text.clone(),
            job_description: session.job_description.clone(),
            can_submit: session.can_submit(),
            notice: session.notice.clone(),
            error: session.lifecycle.error().cloned(),
            report,
            view,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == "pending"
    }
}
