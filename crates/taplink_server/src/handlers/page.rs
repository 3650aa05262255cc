//! Page HTTP handlers.

use super::require_session;
use crate::{error::HttpError, AppError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use hyper::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use taplink_core::codec;
use taplink_core::content::DocumentEditor;
use taplink_core::db::TransactionOps;
use taplink_core::models::page::{
    slugify, CreatePageRequest, Page, PageMeta, UpdatePageRequest,
};

/// One positional block operation against a page's document.
///
/// Dispatched on the `"op"` field; shapes mirror what the page editor UI
/// sends.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BlockOpRequest {
    /// Append a default-initialized block of `component_type`.
    Append { component_type: String },
    /// Merge partial `fields` into the block at `position`.
    Update {
        position: usize,
        fields: Map<String, Value>,
    },
    /// Delete the block at `position`.
    Remove { position: usize },
    /// Move the block at `from` to `to`.
    Move { from: usize, to: usize },
}

fn validated_content(content: &str) -> Result<(), HttpError> {
    // Reject undecodable content at the API boundary; the visitor path would
    // otherwise silently fall back to the unassigned page.
    codec::decode(content)?;
    Ok(())
}

/// Create a new page.
///
/// # Returns
/// The created page as JSON.
///
/// # Errors
/// Returns an error on an empty slug, undecodable content, or a slug
/// conflict.
pub async fn create_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePageRequest>,
) -> Result<Json<Page>, HttpError> {
    let session = require_session(&state, &headers)?;

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Page name must not be empty".to_string()).into());
    }
    if slugify(&req.slug).is_empty() {
        return Err(AppError::BadRequest(
            "Slug must contain at least one alphanumeric character".to_string(),
        )
        .into());
    }
    let content = req.content.unwrap_or_default();
    validated_content(&content)?;

    let mut page = Page::new(
        req.name.trim().to_string(),
        &req.slug,
        content,
        Some(session.user_id),
    );
    if let Some(published) = req.published {
        page.published = published;
    }
    state.db.pages.create(&page)?;
    Ok(Json(page))
}

/// List page metadata rows, most recently updated first.
///
/// # Errors
/// Returns an error if listing fails.
pub async fn list_pages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PageMeta>>, HttpError> {
    require_session(&state, &headers)?;
    Ok(Json(state.db.pages.list_meta()?))
}

/// Fetch a single page by id, falling back to a slug lookup so editor links
/// can address pages either way.
///
/// # Errors
/// Returns 404 when neither an id nor a slug matches.
pub async fn get_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Page>, HttpError> {
    require_session(&state, &headers)?;
    let page = match state.db.pages.get(&id)? {
        Some(page) => page,
        None => state.db.pages.get_by_slug(&id)?.ok_or(AppError::NotFound)?,
    };
    Ok(Json(page))
}

/// Apply a partial update to a page. The slug is fixed at creation.
///
/// # Errors
/// Returns 404 when the page does not exist, 400 on undecodable content.
pub async fn update_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<UpdatePageRequest>,
) -> Result<Json<Page>, HttpError> {
    require_session(&state, &headers)?;
    if let Some(content) = req.content.as_deref() {
        validated_content(content)?;
    }
    let page = state.db.pages.update(&id, &req)?.ok_or(AppError::NotFound)?;
    Ok(Json(page))
}

/// Delete a page and unassign every tag that references it.
///
/// # Errors
/// Returns 404 when the page does not exist.
pub async fn delete_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, HttpError> {
    require_session(&state, &headers)?;
    if !TransactionOps::delete_page_with_unassign(&state.db, &id)? {
        return Err(AppError::NotFound.into());
    }
    Ok(Json(json!({ "deleted": true })))
}

/// Apply one block operation to a page's document and persist the result.
///
/// The stored content is decoded, the operation runs through the editor, and
/// the re-encoded document is written back. A failed operation leaves the
/// stored content untouched.
///
/// # Returns
/// The updated page as JSON.
///
/// # Errors
/// Returns 404 when the page does not exist, 400 when the stored content is
/// undecodable or the operation is invalid.
pub async fn apply_block_op(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<BlockOpRequest>,
) -> Result<Json<Page>, HttpError> {
    require_session(&state, &headers)?;

    let page = state.db.pages.get(&id)?.ok_or(AppError::NotFound)?;
    let document = codec::decode(&page.content)?;

    let mut editor = DocumentEditor::with_document(&state.registry, document);
    match &req {
        BlockOpRequest::Append { component_type } => editor.append(component_type)?,
        BlockOpRequest::Update { position, fields } => editor.update_at(*position, fields)?,
        BlockOpRequest::Remove { position } => {
            editor.remove_at(*position)?;
        }
        BlockOpRequest::Move { from, to } => editor.move_to(*from, *to)?,
    }

    let content = codec::encode(editor.document())?;
    let updated = state
        .db
        .pages
        .save_content(&id, &content)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::BlockOpRequest;
    use serde_json::json;

    #[test]
    fn block_op_payloads_deserialize_by_op_tag() {
        let append: BlockOpRequest =
            serde_json::from_value(json!({ "op": "append", "component_type": "Spacer" }))
                .expect("append");
        assert!(matches!(append, BlockOpRequest::Append { ref component_type }
            if component_type == "Spacer"));

        let update: BlockOpRequest = serde_json::from_value(
            json!({ "op": "update", "position": 2, "fields": { "title": "Hi" } }),
        )
        .expect("update");
        assert!(matches!(update, BlockOpRequest::Update { position: 2, .. }));

        let moved: BlockOpRequest =
            serde_json::from_value(json!({ "op": "move", "from": 0, "to": 1 })).expect("move");
        assert!(matches!(moved, BlockOpRequest::Move { from: 0, to: 1 }));

        serde_json::from_value::<BlockOpRequest>(json!({ "op": "explode" }))
            .expect_err("unknown op must be rejected");
    }
}
