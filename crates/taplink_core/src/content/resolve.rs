//! Resolution of a physical tag UID to its assigned page content.

use super::codec;
use super::component::Document;
use crate::error::AppError;
use crate::models::{page::Page, tag::Tag};

/// Lookup collaborator the resolver reads through.
///
/// Implemented by the database layer; tests substitute in-memory fixtures.
pub trait TagLookup {
    /// Fetch the tag registered under a physical UID.
    ///
    /// # Errors
    /// Propagates storage failures; a missing tag is `Ok(None)`.
    fn load_tag_by_uid(&self, tag_uid: &str) -> Result<Option<Tag>, AppError>;

    /// Fetch a page by id.
    ///
    /// # Errors
    /// Propagates storage failures; a missing page is `Ok(None)`.
    fn load_page(&self, page_id: &str) -> Result<Option<Page>, AppError>;
}

/// Successful resolution payload for visitor-facing rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    pub tag_id: String,
    pub page_id: String,
    pub page_name: String,
    pub document: Document,
}

/// Outcome of resolving a tag identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No tag record matches the identifier.
    NotFound,
    /// The tag exists but has no usable content: no page reference, a
    /// dangling reference, blank stored content, or content that fails to
    /// decode. All of these are the normal "nothing to show" state, not
    /// errors.
    Unassigned { tag_name: Option<String> },
    /// The tag is bound to a page with decodable content.
    Content(ResolvedContent),
}

/// Map a tag identifier to its bound page content.
///
/// Stored content that fails to decode is logged and treated as
/// [`Resolution::Unassigned`]: broken content behaves like no content rather
/// than crashing the visitor path.
///
/// # Arguments
/// - `store`: Lookup collaborator.
/// - `tag_uid`: Physical tag UID from the visitor URL.
///
/// # Errors
/// Propagates storage failures from the collaborator; not-found conditions
/// are modeled in [`Resolution`], not as errors.
pub fn resolve(store: &impl TagLookup, tag_uid: &str) -> Result<Resolution, AppError> {
    let Some(tag) = store.load_tag_by_uid(tag_uid)? else {
        return Ok(Resolution::NotFound);
    };
    let unassigned = Resolution::Unassigned {
        tag_name: Some(tag.name.clone()),
    };

    let Some(page_id) = tag.page_id.as_deref() else {
        return Ok(unassigned);
    };
    let Some(page) = store.load_page(page_id)? else {
        tracing::warn!(
            "tag '{}' references missing page '{}'; treating as unassigned",
            tag.id,
            page_id
        );
        return Ok(unassigned);
    };

    let document = match codec::decode(&page.content) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(
                "stored content for page '{}' failed to decode: {}; treating as unassigned",
                page.id,
                err
            );
            return Ok(unassigned);
        }
    };
    if document.is_empty() {
        return Ok(unassigned);
    }

    Ok(Resolution::Content(ResolvedContent {
        tag_id: tag.id,
        page_id: page.id,
        page_name: page.name,
        document,
    }))
}
