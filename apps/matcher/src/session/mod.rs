//! Sessions — one lifecycle per user, plus the input text last submitted.
//!
//! Each session sits behind its own mutex. The store lock only guards the id
//! map, so sessions never contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinError;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::analysis_client::{AnalysisError, Analyzer};
use crate::lifecycle::{RequestLifecycle, RequestState, SubmitRefused};
use crate::report::MatchReport;

/// Ten years; longer timeouts are treated as "never".
const MAX_IDLE_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub lifecycle: RequestLifecycle,
    /// Kept across failures so the user can retry without retyping.
    pub cv_text: String,
    pub job_description: String,
    /// Set when a submission was refused; cleared by the next accepted one.
    pub notice: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            lifecycle: RequestLifecycle::new(),
            cv_text: String::new(),
            job_description: String::new(),
            notice: None,
            last_seen: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    pub fn can_submit(&self) -> bool {
        self.lifecycle.can_submit(&self.cv_text, &self.job_description)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::seconds(idle_secs.min(MAX_IDLE_SECS) as i64),
        }
    }

    /// Creates a fresh `Idle` session, sweeping idle ones first.
    pub async fn create(&self) -> Uuid {
        self.sweep_idle().await;

        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(Session::new(id))));
        debug!("Session {id} created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drops the session and, with it, any report or error it held.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes sessions idle past the timeout. Pending sessions are kept.
    pub async fn sweep_idle(&self) -> usize {
        let cutoff = Utc::now() - self.idle_timeout;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        let mut expired = Vec::new();
        for (id, handle) in sessions.iter() {
            // A locked session is in use, so it is not idle.
            if let Ok(session) = handle.try_lock() {
                if session.last_seen < cutoff && !session.lifecycle.is_pending() {
                    expired.push(*id);
                }
            }
        }
        for id in &expired {
            sessions.remove(id);
        }

        let removed = before - sessions.len();
        if removed > 0 {
            info!("Swept {removed} idle session(s)");
        }
        removed
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Refused(#[from] SubmitRefused),

    #[error("analysis task aborted: {0}")]
    Aborted(#[from] JoinError),
}

/// Runs one analysis for a session.
///
/// The session is locked only to enter `Pending` and to settle; while the
/// request is in flight other callers see `Pending` and their submits are
/// refused. A refusal leaves the lifecycle untouched and records a notice.
///
/// The request and the settle step run on their own task, so a caller that
/// goes away (closed tab, proxy timeout) cannot leave the session `Pending`.
pub async fn run_analysis(
    session: SessionHandle,
    analyzer: Arc<dyn Analyzer>,
    cv_text: String,
    job_description: String,
) -> Result<RequestState, RunError> {
    let input = {
        let mut guard = session.lock().await;
        guard.touch();
        match guard.lifecycle.submit(&cv_text, &job_description) {
            Ok(input) => {
                guard.cv_text = cv_text;
                guard.job_description = job_description;
                guard.notice = None;
                input
            }
            Err(refused) => {
                // While in flight, keep the text the running request was started with.
                if matches!(refused, SubmitRefused::Invalid(_)) {
                    guard.cv_text = cv_text;
                    guard.job_description = job_description;
                }
                guard.notice = Some(refused.to_string());
                return Err(refused.into());
            }
        }
    };

    let task = tokio::spawn(async move {
        let request = tokio::spawn(async move {
            analyzer
                .analyze(input.cv_text(), input.job_description())
                .await
        });
        let outcome = match request.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Analysis task failed: {e}");
                Err(AnalysisError::Transport(format!("analysis task failed: {e}")))
            }
        };
        settle(&session, outcome).await
    });

    Ok(task.await?)
}

async fn settle(
    session: &Mutex<Session>,
    outcome: Result<MatchReport, AnalysisError>,
) -> RequestState {
    let mut guard = session.lock().await;
    guard.touch();
    // a refusal seen while Pending no longer applies once it settles
    guard.notice = None;
    if let Err(e) = guard.lifecycle.resolve(outcome) {
        // only reachable if something else settled this session's request
        error!("Session {}: {e}", guard.id);
    }
    guard.lifecycle.state().clone()
}
