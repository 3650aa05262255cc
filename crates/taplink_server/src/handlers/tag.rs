//! Tag HTTP handlers.

use super::require_session;
use crate::{error::HttpError, AppError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use hyper::HeaderMap;
use serde_json::{json, Value};
use taplink_core::models::tag::{
    AssignPageRequest, CreateTagRequest, RegisterTagRequest, Tag, TagSummary, UpdateTagRequest,
};

fn visit_url(state: &AppState, tag_uid: &str) -> String {
    format!("{}/t/{}", state.config.base_url.trim_end_matches('/'), tag_uid)
}

/// Create a new tag record. New records start unregistered and unassigned.
///
/// # Errors
/// Returns an error on an empty name or a storage failure.
pub async fn create_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTagRequest>,
) -> Result<Json<Tag>, HttpError> {
    require_session(&state, &headers)?;
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Tag name must not be empty".to_string()).into());
    }
    let tag = Tag::new(req.name.trim().to_string());
    state.db.tags.create(&tag)?;
    Ok(Json(tag))
}

/// List all tag records with their assigned page names.
///
/// # Errors
/// Returns an error if listing fails.
pub async fn list_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TagSummary>>, HttpError> {
    require_session(&state, &headers)?;
    let tags = state.db.tags.list()?;
    let mut rows = Vec::with_capacity(tags.len());
    for tag in tags {
        let page_name = match tag.page_id.as_deref() {
            Some(page_id) => state.db.pages.get(page_id)?.map(|page| page.name),
            None => None,
        };
        rows.push(TagSummary { tag, page_name });
    }
    Ok(Json(rows))
}

/// Fetch a single tag record with its assigned page name and tap total.
///
/// # Errors
/// Returns 404 when the tag does not exist.
pub async fn get_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;
    let tag = state.db.tags.get(&id)?.ok_or(AppError::NotFound)?;
    let page_name = match tag.page_id.as_deref() {
        Some(page_id) => state.db.pages.get(page_id)?.map(|page| page.name),
        None => None,
    };
    let tap_count = state.db.taps.count_for_tag(&tag.id)?;
    let mut body = serde_json::to_value(TagSummary { tag, page_name }).map_err(AppError::Json)?;
    body["tap_count"] = json!(tap_count);
    Ok(Json(body))
}

/// Rename a tag record.
///
/// # Errors
/// Returns 404 when the tag does not exist.
pub async fn update_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, HttpError> {
    require_session(&state, &headers)?;
    let Some(name) = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return Err(AppError::BadRequest("Tag name must not be empty".to_string()).into());
    };
    let tag = state.db.tags.rename(&id, name)?.ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// Delete a tag record. Tap history is kept.
///
/// # Errors
/// Returns 404 when the tag does not exist.
pub async fn delete_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;
    if !state.db.tags.delete(&id)? {
        return Err(AppError::NotFound.into());
    }
    Ok(Json(json!({ "deleted": true })))
}

/// Register a physical card UID against a tag record.
///
/// Re-registering the same UID on the same record is idempotent; a UID held
/// by another record is a conflict.
///
/// # Returns
/// The updated tag plus the public visit URL for the card.
///
/// # Errors
/// Returns 404 for a missing tag record, 409 for a UID conflict.
pub async fn register_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterTagRequest>,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;
    let tag_uid = req.tag_uid.trim();
    if tag_uid.is_empty() {
        return Err(AppError::BadRequest("Tag UID must not be empty".to_string()).into());
    }
    let tag = state
        .db
        .tags
        .register_uid(&req.tag_id, tag_uid)?
        .ok_or(AppError::NotFound)?;
    tracing::info!("Registered card '{}' to tag '{}'", tag_uid, tag.id);
    let url = visit_url(&state, tag_uid);
    Ok(Json(json!({ "tag": tag, "url": url })))
}

/// Assign a page to a tag record, replacing any previous assignment.
///
/// # Errors
/// Returns 404 when the tag or the page does not exist.
pub async fn assign_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AssignPageRequest>,
) -> Result<Json<Tag>, HttpError> {
    require_session(&state, &headers)?;
    if state.db.pages.get(&req.page_id)?.is_none() {
        return Err(AppError::BadRequest(format!(
            "Page with id '{}' does not exist",
            req.page_id
        ))
        .into());
    }
    let tag = state
        .db
        .tags
        .assign_page(&req.tag_id, Some(&req.page_id))?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}

/// Clear the page assignment on a tag record.
///
/// # Errors
/// Returns 404 when the tag does not exist.
pub async fn unassign_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Tag>, HttpError> {
    require_session(&state, &headers)?;
    let tag = state
        .db
        .tags
        .assign_page(&id, None)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}
