//! Editor account and session HTTP handlers.

use super::require_session;
use crate::{error::HttpError, AppError, AppState};
use axum::{extract::State, http::header, Json};
use hyper::HeaderMap;
use serde_json::{json, Value};
use taplink_core::models::user::{LoginRequest, RegisterRequest, User, UserProfile};

fn validated_register_request(req: &RegisterRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name must not be empty".to_string()));
    }
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest(
            "A valid email address is required".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

/// Register a new editor account.
///
/// # Returns
/// The created account's public profile as JSON.
///
/// # Errors
/// Returns an error if validation fails or the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserProfile>, HttpError> {
    validated_register_request(&req)?;
    let user = User::new(req.name.trim().to_string(), &req.email, &req.password);
    state.db.users.create(&user)?;
    tracing::info!("Registered editor account '{}'", user.email);
    Ok(Json(UserProfile::from(&user)))
}

/// Log in and start a bearer-token session.
///
/// # Returns
/// `{ "token": ..., "user": {...} }` as JSON.
///
/// # Errors
/// Returns 401 on unknown email or wrong password; the two cases are not
/// distinguished in the response.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, HttpError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state.db.users.get_by_email(&req.email)?.ok_or_else(invalid)?;
    if !user.verify_password(&req.password) {
        return Err(invalid().into());
    }

    let token = state
        .sessions
        .issue(&user.id)
        .map_err(|err| AppError::StorageMessage(err.to_string()))?;
    Ok(Json(json!({
        "token": token,
        "user": UserProfile::from(&user),
    })))
}

/// End the current session.
///
/// Always succeeds for an authenticated caller; the token is invalid
/// afterwards.
///
/// # Errors
/// Returns 401 when no valid session token is presented.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;
    // require_session already validated the header shape.
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        state
            .sessions
            .revoke(token.trim())
            .map_err(|err| AppError::StorageMessage(err.to_string()))?;
    }
    Ok(Json(json!({ "ok": true })))
}

/// Return the profile behind the current session token.
///
/// # Errors
/// Returns 401 without a valid session, 404 if the account was deleted.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, HttpError> {
    let session = require_session(&state, &headers)?;
    let user = state
        .db
        .users
        .get(&session.user_id)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(UserProfile::from(&user)))
}
