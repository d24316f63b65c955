//! Request lifecycle — `Idle → Pending → Succeeded | Failed`, re-enterable.
//!
//! The lifecycle is the only place that enforces one in-flight analysis per
//! session: `submit` is refused while `Pending`. Entering `Pending` drops the
//! previous report or error immediately, so stale results never show next to
//! a running analysis.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::analysis_client::{AnalysisError, AnalysisInput, ValidationError};
use crate::report::MatchReport;

/// A single human-readable failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMessage(String);

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded(MatchReport),
    Failed(ErrorMessage),
}

impl RequestState {
    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Pending => "pending",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }
}

/// Why a submission was refused. A refusal never changes the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRefused {
    #[error("An analysis is already in progress")]
    InFlight,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("no analysis is pending (state: {0})")]
    NotPending(&'static str),
}

#[derive(Debug, Clone, Default)]
pub struct RequestLifecycle {
    state: RequestState,
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RequestState::Pending)
    }

    /// Submit enablement: inputs non-blank and nothing in flight.
    pub fn can_submit(&self, cv_text: &str, job_description: &str) -> bool {
        !self.is_pending() && AnalysisInput::is_submittable(cv_text, job_description)
    }

    /// Moves to `Pending` and hands back the validated input to send.
    pub fn submit(
        &mut self,
        cv_text: &str,
        job_description: &str,
    ) -> Result<AnalysisInput, SubmitRefused> {
        if self.is_pending() {
            return Err(SubmitRefused::InFlight);
        }
        let input = AnalysisInput::new(cv_text, job_description)?;

        debug!("Lifecycle {} -> pending", self.state.name());
        self.state = RequestState::Pending;
        Ok(input)
    }

    /// Settles a pending analysis. Every outcome lands in a defined state.
    pub fn resolve(
        &mut self,
        outcome: Result<MatchReport, AnalysisError>,
    ) -> Result<&RequestState, LifecycleError> {
        if !self.is_pending() {
            return Err(LifecycleError::NotPending(self.state.name()));
        }

        self.state = match outcome {
            Ok(report) => RequestState::Succeeded(report),
            Err(e) => RequestState::Failed(ErrorMessage::new(e.user_message())),
        };
        debug!("Lifecycle pending -> {}", self.state.name());
        Ok(&self.state)
    }

    pub fn report(&self) -> Option<&MatchReport> {
        match &self.state {
            RequestState::Succeeded(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorMessage> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
