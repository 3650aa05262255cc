//! HTTP request handlers.

/// Editor account and session endpoints.
pub mod auth;
/// Page CRUD and block-operation endpoints.
pub mod page;
/// Dashboard and analytics endpoints.
pub mod stats;
/// Tag CRUD, registration, and assignment endpoints.
pub mod tag;
/// Public visitor endpoint for tag resolution.
pub mod visit;

use crate::error::HttpError;
use crate::sessions::{Session, SessionError};
use crate::AppState;
use axum::http::header;
use hyper::HeaderMap;
use taplink_core::AppError;

/// Resolve the editor session behind a request's bearer token.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] (as [`HttpError`]) when the header is
/// missing, not a bearer token, or names no active session.
pub(crate) fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Session, HttpError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    match state.sessions.authorize(token) {
        Ok(session) => Ok(session),
        Err(SessionError::Unknown) => {
            Err(AppError::Unauthorized("Invalid or expired session".to_string()).into())
        }
        Err(SessionError::Poisoned) => {
            Err(AppError::StorageMessage("Session manager is unavailable".to_string()).into())
        }
    }
}
