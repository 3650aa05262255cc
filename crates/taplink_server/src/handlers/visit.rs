//! Public visitor handler: tag UID to rendered HTML page.

use crate::{error::HttpError, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use hyper::HeaderMap;
use taplink_core::content::{render_not_found, render_unassigned, resolve, Renderer, Resolution};
use taplink_core::models::tap::TapRecord;

fn client_address(headers: &HeaderMap) -> Option<String> {
    // Best-effort only; the server usually sits behind localhost or a proxy.
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Resolve a physical tag UID and render the visitor-facing page.
///
/// Every successful content resolution records an analytics tap. Unassigned
/// and broken-content tags render a friendly placeholder instead of an error.
///
/// # Errors
/// Returns an error only on storage failures; missing tags and unassigned
/// content are rendered states, not errors.
pub async fn visit_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(tag_uid): Path<String>,
) -> Result<(StatusCode, Html<String>), HttpError> {
    match resolve(state.db.as_ref(), &tag_uid)? {
        Resolution::NotFound => {
            tracing::debug!("Visit for unknown tag UID '{}'", tag_uid);
            Ok((StatusCode::NOT_FOUND, Html(render_not_found())))
        }
        Resolution::Unassigned { tag_name } => {
            let label = tag_name.unwrap_or_else(|| tag_uid.clone());
            Ok((StatusCode::OK, Html(render_unassigned(&label))))
        }
        Resolution::Content(resolved) => {
            let tap = TapRecord::new(
                resolved.tag_id.clone(),
                resolved.page_id.clone(),
                client_address(&headers),
            );
            // A failed tap write must not break the visitor page.
            if let Err(err) = state.db.taps.record(&tap) {
                tracing::warn!("Failed to record tap for tag '{}': {}", resolved.tag_id, err);
            }

            let renderer = Renderer::new(&state.registry);
            let html = renderer.render_page(&resolved.page_name, &resolved.document);
            Ok((StatusCode::OK, Html(html)))
        }
    }
}
