//! Tap analytics records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One visitor hit on a resolved tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapRecord {
    pub id: String,
    pub tag_id: String,
    pub page_id: String,
    /// Best-effort client address; absent when it cannot be determined.
    pub ip_address: Option<String>,
    pub at: DateTime<Utc>,
}

/// Per-tag tap totals for the analytics summary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagTapSummary {
    pub tag_id: String,
    pub tag_name: String,
    pub tag_uid: Option<String>,
    pub tap_count: u64,
}

impl TapRecord {
    /// Record a tap happening now.
    pub fn new(tag_id: String, page_id: String, ip_address: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tag_id,
            page_id,
            ip_address,
            at: Utc::now(),
        }
    }
}
