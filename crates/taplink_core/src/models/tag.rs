//! NFC tag models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// NFC tag record.
///
/// Lifecycle: created with `tag_uid` and `page_id` both unset; the physical
/// UID is set once by a registration step; the page reference is set and
/// cleared by assignment operations. The tag only has effective content once
/// both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    /// Physical card UID, unique once registered.
    pub tag_uid: Option<String>,
    /// Assigned page id, if any.
    pub page_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag row decorated with its assigned page name for list views.
#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    #[serde(flatten)]
    pub tag: Tag,
    pub page_name: Option<String>,
}

/// Request payload for creating a tag record.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Request payload for renaming a tag record.
#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}

/// Request payload for registering a physical card UID against a tag record.
#[derive(Debug, Deserialize)]
pub struct RegisterTagRequest {
    pub tag_id: String,
    pub tag_uid: String,
}

/// Request payload for assigning or unassigning a page.
#[derive(Debug, Deserialize)]
pub struct AssignPageRequest {
    pub tag_id: String,
    pub page_id: String,
}

impl Tag {
    /// Create a new, unregistered and unassigned tag record.
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            tag_uid: None,
            page_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a physical card has been registered to this record.
    pub fn is_registered(&self) -> bool {
        self.tag_uid.is_some()
    }

    /// Whether a page is currently assigned.
    pub fn is_assigned(&self) -> bool {
        self.page_id.is_some()
    }
}
