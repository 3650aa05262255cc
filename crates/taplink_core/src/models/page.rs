//! Content page models and slug handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Page entity stored in the database and returned by the API.
///
/// `content` holds the serialized block document; the storage layer treats it
/// as an opaque string and the content codec owns its shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub content: String,
    pub author_id: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lightweight page row used by list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub published: bool,
    pub component_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a page.
#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub name: String,
    pub slug: String,
    /// Serialized block document; missing means a blank page.
    pub content: Option<String>,
    pub published: Option<bool>,
}

/// Request payload for updating a page. The slug is fixed at creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePageRequest {
    pub name: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl Page {
    /// Create a new page with a normalized slug and fresh timestamps.
    ///
    /// # Arguments
    /// - `name`: Display name.
    /// - `slug`: URL slug (normalized through [`slugify`]).
    /// - `content`: Serialized block document.
    /// - `author_id`: Creating editor's id.
    ///
    /// # Returns
    /// A new [`Page`] instance.
    pub fn new(name: String, slug: &str, content: String, author_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug: slugify(slug),
            content,
            author_id,
            published: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&Page> for PageMeta {
    fn from(value: &Page) -> Self {
        // Undecodable stored content counts as zero blocks; list views never
        // fail on a broken row.
        let component_count = crate::content::codec::decode(&value.content)
            .map(|document| document.len())
            .unwrap_or(0);
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            slug: value.slug.clone(),
            published: value.published,
            component_count,
            updated_at: value.updated_at,
        }
    }
}

/// Normalize a slug: lowercase, whitespace runs become single hyphens, and
/// anything outside `[a-z0-9-]` is dropped.
///
/// # Returns
/// The normalized slug (possibly empty; callers reject empty slugs).
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_was_hyphen = true;
    for ch in raw.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
