//! Database layer and transactional helpers for TapLink.

/// Page storage helpers.
pub mod page;
/// redb table definitions.
pub mod tables;
/// NFC tag storage helpers.
pub mod tag;
/// Tap analytics storage helpers.
pub mod tap;
/// Editor account storage helpers.
pub mod user;

#[cfg(test)]
mod tests;

use crate::content::TagLookup;
use crate::error::AppError;
use crate::models::{page::Page, tag::Tag};
use redb::ReadableTable;
use std::sync::Arc;
use tables::*;

/// Database handle with accessors for each entity's tables.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pages: page::PageDb,
    pub tags: tag::TagDb,
    pub users: user::UserDb,
    pub taps: tap::TapDb,
}

impl Database {
    /// Open the database and initialize all tables.
    ///
    /// # Arguments
    /// - `path`: Database directory; created when missing.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb cannot
    /// open the database file.
    pub fn new(path: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(path).map_err(|err| {
            AppError::StorageMessage(format!("failed to create db directory '{}': {}", path, err))
        })?;
        let file = std::path::Path::new(path).join(REDB_FILE_NAME);
        let db = Arc::new(redb::Database::create(&file)?);
        Self::from_shared(db)
    }

    fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            pages: page::PageDb::new(db.clone())?,
            tags: tag::TagDb::new(db.clone())?,
            users: user::UserDb::new(db.clone())?,
            taps: tap::TapDb::new(db.clone())?,
            db,
        })
    }
}

impl TagLookup for Database {
    fn load_tag_by_uid(&self, tag_uid: &str) -> Result<Option<Tag>, AppError> {
        self.tags.get_by_uid(tag_uid)
    }

    fn load_page(&self, page_id: &str) -> Result<Option<Page>, AppError> {
        self.pages.get(page_id)
    }
}

/// Cross-table operations that must stay consistent.
///
/// redb write transactions span multiple tables, so these run each invariant
/// inside a single transaction.
pub struct TransactionOps;

impl TransactionOps {
    /// Delete a page and clear the assignment on every tag that references it.
    ///
    /// # Arguments
    /// - `db`: Database handle.
    /// - `page_id`: Page to delete.
    ///
    /// # Returns
    /// `Ok(true)` if a page was deleted, `Ok(false)` if not found.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails; on error
    /// the transaction is not committed.
    pub fn delete_page_with_unassign(db: &Database, page_id: &str) -> Result<bool, AppError> {
        let write_txn = db.db.begin_write()?;
        let deleted;
        {
            let mut pages = write_txn.open_table(PAGES)?;
            let mut slugs = write_txn.open_table(PAGES_BY_SLUG)?;
            let mut tags = write_txn.open_table(TAGS)?;

            let removed = pages.remove(page_id)?;
            match removed {
                None => {
                    deleted = false;
                }
                Some(value) => {
                    let page: Page = bincode::deserialize(value.value())?;
                    drop(value);
                    let _ = slugs.remove(page.slug.as_str())?;

                    // Collect first; rewriting rows while iterating the same
                    // table is not allowed.
                    let mut assigned: Vec<Tag> = Vec::new();
                    for item in tags.iter()? {
                        let (_, row) = item?;
                        let tag: Tag = bincode::deserialize(row.value())?;
                        if tag.page_id.as_deref() == Some(page_id) {
                            assigned.push(tag);
                        }
                    }
                    for mut tag in assigned {
                        tag.page_id = None;
                        tag.updated_at = chrono::Utc::now();
                        let encoded = bincode::serialize(&tag)?;
                        tags.insert(tag.id.as_str(), encoded.as_slice())?;
                    }
                    deleted = true;
                }
            }
        }
        write_txn.commit()?;
        Ok(deleted)
    }
}
