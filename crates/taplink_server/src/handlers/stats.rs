//! Dashboard and analytics HTTP handlers.

use super::require_session;
use crate::{error::HttpError, AppState};
use axum::{extract::State, Json};
use hyper::HeaderMap;
use serde_json::{json, Value};

/// Enumerate the registered component kinds with labels and field schemas.
///
/// Drives the "add block" palette in the page editor.
///
/// # Errors
/// Returns 401 without a valid session.
pub async fn list_components(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;
    let components: Vec<Value> = state
        .registry
        .entries()
        .iter()
        .map(|entry| {
            json!({
                "type": entry.kind.as_str(),
                "label": entry.label,
                "fields": entry.fields,
            })
        })
        .collect();
    Ok(Json(json!({ "components": components })))
}

/// Aggregate entity counts for the dashboard.
///
/// # Errors
/// Returns an error if any count query fails.
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;

    let user_total = state.db.users.count()?;
    let page_metas = state.db.pages.list_meta()?;
    let page_total = page_metas.len() as u64;
    let page_live = page_metas.iter().filter(|meta| meta.published).count() as u64;
    let tag_counts = state.db.tags.counts()?;

    Ok(Json(json!({
        "user": { "total": user_total },
        "page": {
            "total": page_total,
            "live": page_live,
            "draft": page_total - page_live,
        },
        "tag": {
            "total": tag_counts.total,
            "registered": tag_counts.registered,
            "unregistered": tag_counts.total - tag_counts.registered,
            "assigned": tag_counts.assigned,
            "unassigned": tag_counts.total - tag_counts.assigned,
        },
    })))
}

/// Per-tag tap totals, most tapped first, plus the overall total.
///
/// # Errors
/// Returns an error if a storage query fails.
pub async fn analytics_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;
    let tags = state.db.tags.list()?;
    let rows = state.db.taps.summary(&tags)?;
    let total = state.db.taps.count_total()?;
    Ok(Json(json!({ "total_taps": total, "tags": rows })))
}
