//! Server-rendered HTML page for one session.
//!
//! Self-contained: inline CSS, no scripts. While an analysis is pending the
//! page refreshes itself until the session settles. All text is escaped by
//! the template engine.

use askama::Template;

use super::SessionView;

const PENDING_REFRESH_SECS: u32 = 2;

#[derive(Template)]
#[template(path = "session.html")]
pub struct SessionPage<'a> {
    view: &'a SessionView,
    pending: bool,
    refresh_secs: u32,
}

impl<'a> SessionPage<'a> {
    pub fn new(view: &'a SessionView) -> Self {
        Self {
            view,
            pending: view.is_pending(),
            refresh_secs: PENDING_REFRESH_SECS,
        }
    }
}
