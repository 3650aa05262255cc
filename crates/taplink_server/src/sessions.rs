//! In-memory bearer-token sessions shared across API handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Session-manager runtime errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No session matches the presented token.
    Unknown,
    /// Internal mutex state is poisoned.
    Poisoned,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "no active session matches this token"),
            Self::Poisoned => write!(f, "session manager state is poisoned"),
        }
    }
}

impl std::error::Error for SessionError {}

/// One logged-in editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

/// Tracks active bearer tokens for logged-in editors.
///
/// Tokens are random UUIDs and live only for the process lifetime; a restart
/// logs everyone out, which is acceptable for a self-hosted tool.
#[derive(Default)]
pub struct SessionManager {
    inner: Mutex<HashMap<String, Session>>,
}

impl SessionManager {
    fn state(&self) -> Result<MutexGuard<'_, HashMap<String, Session>>, SessionError> {
        self.inner.lock().map_err(|_| SessionError::Poisoned)
    }

    /// Start a session for a user and hand back its bearer token.
    ///
    /// # Errors
    /// Returns [`SessionError::Poisoned`] when session state is poisoned.
    pub fn issue(&self, user_id: &str) -> Result<String, SessionError> {
        let token = uuid::Uuid::new_v4().to_string();
        let mut state = self.state()?;
        state.insert(
            token.clone(),
            Session {
                user_id: user_id.to_string(),
            },
        );
        Ok(token)
    }

    /// Look up the session behind a token.
    ///
    /// # Errors
    /// Returns [`SessionError::Unknown`] for a token with no active session,
    /// or [`SessionError::Poisoned`] when session state is poisoned.
    pub fn authorize(&self, token: &str) -> Result<Session, SessionError> {
        let state = self.state()?;
        state.get(token).cloned().ok_or(SessionError::Unknown)
    }

    /// End the session behind a token.
    ///
    /// Revoking an unknown token is a no-op; logout never fails on a stale
    /// client.
    ///
    /// # Errors
    /// Returns [`SessionError::Poisoned`] when session state is poisoned.
    pub fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let mut state = self.state()?;
        state.remove(token);
        Ok(())
    }

    /// Number of active sessions.
    ///
    /// # Errors
    /// Returns [`SessionError::Poisoned`] when session state is poisoned.
    pub fn active_count(&self) -> Result<usize, SessionError> {
        Ok(self.state()?.len())
    }
}
