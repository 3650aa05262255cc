//! Page storage operations backed by redb.

use crate::db::tables::*;
use crate::error::AppError;
use crate::models::page::{Page, PageMeta, UpdatePageRequest};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for page-related redb tables.
pub struct PageDb {
    db: Arc<redb::Database>,
}

pub(crate) fn deserialize_page(bytes: &[u8]) -> Result<Page, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

impl PageDb {
    /// Initialize page tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PAGES)?;
        write_txn.open_table(PAGES_BY_SLUG)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new page row and its slug index entry atomically.
    ///
    /// # Arguments
    /// - `page`: Page row to persist.
    ///
    /// # Returns
    /// `Ok(())` when the insert commits.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the slug is already taken, or a
    /// storage error otherwise.
    pub fn create(&self, page: &Page) -> Result<(), AppError> {
        let encoded = bincode::serialize(page)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut pages = write_txn.open_table(PAGES)?;
            let mut slugs = write_txn.open_table(PAGES_BY_SLUG)?;

            if slugs.get(page.slug.as_str())?.is_some() {
                return Err(AppError::Conflict(format!(
                    "A page with slug '{}' already exists",
                    page.slug
                )));
            }
            if pages.get(page.id.as_str())?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Page id '{}' already exists",
                    page.id
                )));
            }

            pages.insert(page.id.as_str(), encoded.as_slice())?;
            slugs.insert(page.slug.as_str(), page.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a page by id.
    ///
    /// # Returns
    /// `Ok(Some(page))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Page>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pages = read_txn.open_table(PAGES)?;
        match pages.get(id)? {
            Some(value) => Ok(Some(deserialize_page(value.value())?)),
            None => Ok(None),
        }
    }

    /// Fetch a page by its unique slug.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        let read_txn = self.db.begin_read()?;
        let slugs = read_txn.open_table(PAGES_BY_SLUG)?;
        let Some(id_guard) = slugs.get(slug)? else {
            return Ok(None);
        };
        let id = id_guard.value().to_string();
        drop(id_guard);
        let pages = read_txn.open_table(PAGES)?;
        match pages.get(id.as_str())? {
            Some(value) => Ok(Some(deserialize_page(value.value())?)),
            None => Ok(None),
        }
    }

    /// Apply a partial update to a page. The slug is immutable.
    ///
    /// # Arguments
    /// - `id`: Page id to update.
    /// - `update`: Update payload.
    ///
    /// # Returns
    /// `Ok(Some(page))` with the updated row, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update(&self, id: &str, update: &UpdatePageRequest) -> Result<Option<Page>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated;
        {
            let mut pages = write_txn.open_table(PAGES)?;
            let Some(value) = pages.get(id)? else {
                return Ok(None);
            };
            let mut page = deserialize_page(value.value())?;
            drop(value);

            if let Some(name) = &update.name {
                page.name = name.clone();
            }
            if let Some(content) = &update.content {
                page.content = content.clone();
            }
            if let Some(published) = update.published {
                page.published = published;
            }
            page.updated_at = chrono::Utc::now();

            let encoded = bincode::serialize(&page)?;
            pages.insert(id, encoded.as_slice())?;
            updated = page;
        }
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Overwrite a page's stored content string.
    ///
    /// Used by the block-operation endpoint after the editor re-encodes the
    /// working document.
    ///
    /// # Returns
    /// `Ok(Some(page))` with the updated row, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn save_content(&self, id: &str, content: &str) -> Result<Option<Page>, AppError> {
        self.update(
            id,
            &UpdatePageRequest {
                name: None,
                content: Some(content.to_string()),
                published: None,
            },
        )
    }

    /// List page metadata rows, most recently updated first.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list_meta(&self) -> Result<Vec<PageMeta>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pages = read_txn.open_table(PAGES)?;
        let mut rows = Vec::new();
        for item in pages.iter()? {
            let (_, value) = item?;
            let page = deserialize_page(value.value())?;
            rows.push(PageMeta::from(&page));
        }
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    /// Count all pages.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pages = read_txn.open_table(PAGES)?;
        let mut count = 0u64;
        for item in pages.iter()? {
            item?;
            count += 1;
        }
        Ok(count)
    }
}
