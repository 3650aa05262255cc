//! NFC tag storage operations backed by redb.

use crate::db::tables::*;
use crate::error::AppError;
use crate::models::tag::Tag;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for tag-related redb tables.
pub struct TagDb {
    db: Arc<redb::Database>,
}

/// Registration/assignment counts used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagCounts {
    pub total: u64,
    pub registered: u64,
    pub assigned: u64,
}

pub(crate) fn deserialize_tag(bytes: &[u8]) -> Result<Tag, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

impl TagDb {
    /// Initialize tag tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(TAGS)?;
        write_txn.open_table(TAGS_BY_UID)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new tag row. New tags start unregistered and unassigned.
    ///
    /// # Errors
    /// Returns an error when serialization or storage operations fail.
    pub fn create(&self, tag: &Tag) -> Result<(), AppError> {
        let encoded = bincode::serialize(tag)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut tags = write_txn.open_table(TAGS)?;
            if tags.get(tag.id.as_str())?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Tag id '{}' already exists",
                    tag.id
                )));
            }
            tags.insert(tag.id.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a tag by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<Tag>, AppError> {
        let read_txn = self.db.begin_read()?;
        let tags = read_txn.open_table(TAGS)?;
        match tags.get(id)? {
            Some(value) => Ok(Some(deserialize_tag(value.value())?)),
            None => Ok(None),
        }
    }

    /// Fetch a tag by its registered physical UID.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get_by_uid(&self, tag_uid: &str) -> Result<Option<Tag>, AppError> {
        let read_txn = self.db.begin_read()?;
        let uids = read_txn.open_table(TAGS_BY_UID)?;
        let Some(id_guard) = uids.get(tag_uid)? else {
            return Ok(None);
        };
        let id = id_guard.value().to_string();
        drop(id_guard);
        let tags = read_txn.open_table(TAGS)?;
        match tags.get(id.as_str())? {
            Some(value) => Ok(Some(deserialize_tag(value.value())?)),
            None => Ok(None),
        }
    }

    /// Rename a tag.
    ///
    /// # Returns
    /// `Ok(Some(tag))` with the updated row, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn rename(&self, id: &str, name: &str) -> Result<Option<Tag>, AppError> {
        self.mutate(id, |tag| {
            tag.name = name.to_string();
            Ok(())
        })
    }

    /// Register a physical card UID against a tag record.
    ///
    /// The UID is set once: re-registering the same UID on the same record is
    /// idempotent, while a UID held by another record is a conflict.
    ///
    /// # Returns
    /// `Ok(Some(tag))` with the updated row, `Ok(None)` when the tag record
    /// is missing.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the UID belongs to another record,
    /// or a storage error otherwise.
    pub fn register_uid(&self, id: &str, tag_uid: &str) -> Result<Option<Tag>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated;
        {
            let mut tags = write_txn.open_table(TAGS)?;
            let mut uids = write_txn.open_table(TAGS_BY_UID)?;

            if let Some(holder) = uids.get(tag_uid)? {
                let holder_id = holder.value().to_string();
                drop(holder);
                if holder_id != id {
                    return Err(AppError::Conflict(
                        "This physical card is already registered to another tag record"
                            .to_string(),
                    ));
                }
            }

            let Some(value) = tags.get(id)? else {
                return Ok(None);
            };
            let mut tag = deserialize_tag(value.value())?;
            drop(value);

            if let Some(existing) = tag.tag_uid.as_deref() {
                if existing != tag_uid {
                    let _ = uids.remove(existing)?;
                }
            }
            tag.tag_uid = Some(tag_uid.to_string());
            tag.updated_at = chrono::Utc::now();

            let encoded = bincode::serialize(&tag)?;
            tags.insert(id, encoded.as_slice())?;
            uids.insert(tag_uid, id)?;
            updated = tag;
        }
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Set or clear the assigned page reference.
    ///
    /// # Arguments
    /// - `id`: Tag id.
    /// - `page_id`: `Some` to assign, `None` to unassign.
    ///
    /// # Returns
    /// `Ok(Some(tag))` with the updated row, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn assign_page(&self, id: &str, page_id: Option<&str>) -> Result<Option<Tag>, AppError> {
        self.mutate(id, |tag| {
            tag.page_id = page_id.map(str::to_string);
            Ok(())
        })
    }

    /// Delete a tag and its UID index entry.
    ///
    /// Tap history intentionally survives tag deletion so analytics totals
    /// stay meaningful.
    ///
    /// # Returns
    /// `Ok(true)` if a tag was deleted, `Ok(false)` if not found.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted;
        {
            let mut tags = write_txn.open_table(TAGS)?;
            let mut uids = write_txn.open_table(TAGS_BY_UID)?;
            let removed = tags.remove(id)?;
            match removed {
                None => {
                    deleted = false;
                }
                Some(value) => {
                    let tag = deserialize_tag(value.value())?;
                    drop(value);
                    if let Some(uid) = tag.tag_uid.as_deref() {
                        let _ = uids.remove(uid)?;
                    }
                    deleted = true;
                }
            }
        }
        write_txn.commit()?;
        Ok(deleted)
    }

    /// List all tags, most recently created first.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<Tag>, AppError> {
        let read_txn = self.db.begin_read()?;
        let tags = read_txn.open_table(TAGS)?;
        let mut rows = Vec::new();
        for item in tags.iter()? {
            let (_, value) = item?;
            rows.push(deserialize_tag(value.value())?);
        }
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    /// Count tags by lifecycle state for the dashboard.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn counts(&self) -> Result<TagCounts, AppError> {
        let read_txn = self.db.begin_read()?;
        let tags = read_txn.open_table(TAGS)?;
        let mut counts = TagCounts::default();
        for item in tags.iter()? {
            let (_, value) = item?;
            let tag = deserialize_tag(value.value())?;
            counts.total += 1;
            if tag.is_registered() {
                counts.registered += 1;
            }
            if tag.is_assigned() {
                counts.assigned += 1;
            }
        }
        Ok(counts)
    }

    fn mutate(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Tag) -> Result<(), AppError>,
    ) -> Result<Option<Tag>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated;
        {
            let mut tags = write_txn.open_table(TAGS)?;
            let Some(value) = tags.get(id)? else {
                return Ok(None);
            };
            let mut tag = deserialize_tag(value.value())?;
            drop(value);

            apply(&mut tag)?;
            tag.updated_at = chrono::Utc::now();

            let encoded = bincode::serialize(&tag)?;
            tags.insert(id, encoded.as_slice())?;
            updated = tag;
        }
        write_txn.commit()?;
        Ok(Some(updated))
    }
}
