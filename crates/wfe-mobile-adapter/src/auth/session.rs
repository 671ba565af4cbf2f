/*
[INPUT]:  Bearer tokens and display names from a successful login
[OUTPUT]: Session retrieval and teardown
[POS]:    Auth layer - in-memory session lifecycle
[UPDATE]: When changing what a session carries or how it is stored
*/

use std::fmt;
use std::sync::{Arc, RwLock};

/// An authenticated user session, held in memory only
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub display_name: String,
}

impl Session {
    pub fn new(token: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            display_name: display_name.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Thread-safe holder of the current session
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    data: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session
    pub fn set(&self, session: Session) {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session);
    }

    /// Get the current session if logged in
    pub fn get(&self) -> Option<Session> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }

    /// Get the current token if logged in
    pub fn token(&self) -> Option<String> {
        self.get().map(|session| session.token)
    }

    pub fn is_logged_in(&self) -> bool {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.is_some()
    }

    /// Drop the current session
    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}
