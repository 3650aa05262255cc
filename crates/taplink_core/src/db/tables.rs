//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical page rows (`Page`, bincode-encoded).
pub const PAGES: TableDefinition<&str, &[u8]> = TableDefinition::new("pages");
/// Slug uniqueness index: slug -> page id.
pub const PAGES_BY_SLUG: TableDefinition<&str, &str> = TableDefinition::new("pages_by_slug");

/// Canonical tag rows (`Tag`, bincode-encoded).
pub const TAGS: TableDefinition<&str, &[u8]> = TableDefinition::new("tags");
/// Physical UID uniqueness index: tag UID -> tag id.
pub const TAGS_BY_UID: TableDefinition<&str, &str> = TableDefinition::new("tags_by_uid");

/// Canonical user rows (`User`, bincode-encoded).
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
/// Email uniqueness index: lowercased email -> user id.
pub const USERS_BY_EMAIL: TableDefinition<&str, &str> = TableDefinition::new("users_by_email");

/// Canonical tap rows (`TapRecord`, bincode-encoded).
pub const TAPS: TableDefinition<&str, &[u8]> = TableDefinition::new("taps");
/// Per-tag tap index: (tag id, tap id).
pub const TAPS_BY_TAG: TableDefinition<(&str, &str), ()> = TableDefinition::new("taps_by_tag");
