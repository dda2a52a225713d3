//! Per-browser session state.
//!
//! Each browser carries an opaque id in a cookie. Only state-changing requests
//! register a session; reads from an unknown browser render against a
//! throwaway default. Sessions are never shared.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::Notice;
use crate::model::Role;
use crate::router::Page;

pub const SESSION_COOKIE: &str = "cohort_session";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub logged_in: bool,
    pub role: Option<Role>,
    pub username: Option<String>,
    /// Role picked on the login options page, preselected on the login form.
    pub selected_role: Option<Role>,
    pub page: Page,
    /// Notices waiting to be shown on the next render.
    pub flash: Vec<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            logged_in: false,
            role: None,
            username: None,
            selected_role: None,
            page: Page::Welcome,
            flash: Vec::new(),
        }
    }
}

impl Session {
    /// Username of the session if it is logged in with exactly this role.
    pub fn identity_for(&self, role: Role) -> Option<&str> {
        if self.logged_in && self.role == Some(role) {
            self.username.as_deref()
        } else {
            None
        }
    }

    pub fn log_in(&mut self, role: Role, username: &str) {
        self.logged_in = true;
        self.role = Some(role);
        self.username = Some(username.to_string());
    }

    pub fn log_out(&mut self) {
        self.logged_in = false;
        self.role = None;
        self.username = None;
    }

    pub fn take_flash(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.flash)
    }
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // a panicked request leaves plain data behind, nothing half-written
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resolve a cookie value to a known session id, creating a session when needed.
    pub fn resolve(&self, cookie: Option<&str>) -> (String, bool) {
        let mut sessions = self.lock();
        if let Some(id) = cookie.filter(|id| sessions.contains_key(*id)) {
            return (id.to_string(), false);
        }
        let id = Uuid::new_v4().to_string();
        sessions.insert(id.clone(), Session::default());
        log::debug!("Started session {}", id);
        (id, true)
    }

    /// Run `f` against the session behind this cookie, if the registry knows it.
    /// Never registers a session.
    pub fn with_known<T>(
        &self,
        cookie: Option<&str>,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Option<T> {
        let mut sessions = self.lock();
        cookie.and_then(|id| sessions.get_mut(id)).map(f)
    }

    /// Run `f` against the session with this id.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut sessions = self.lock();
        let session = sessions.entry(id.to_string()).or_default();
        f(session)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
