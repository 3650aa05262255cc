//! Tap analytics storage operations backed by redb.

use crate::db::tables::*;
use crate::error::AppError;
use crate::models::tap::{TagTapSummary, TapRecord};
use crate::models::tag::Tag;
use redb::{ReadableDatabase, ReadableTable};
use std::collections::HashMap;
use std::sync::Arc;

/// Accessor for tap-related redb tables.
pub struct TapDb {
    db: Arc<redb::Database>,
}

impl TapDb {
    /// Initialize tap tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(TAPS)?;
        write_txn.open_table(TAPS_BY_TAG)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Record one visitor tap.
    ///
    /// # Errors
    /// Returns an error when serialization or storage operations fail.
    pub fn record(&self, tap: &TapRecord) -> Result<(), AppError> {
        let encoded = bincode::serialize(tap)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut taps = write_txn.open_table(TAPS)?;
            let mut by_tag = write_txn.open_table(TAPS_BY_TAG)?;
            taps.insert(tap.id.as_str(), encoded.as_slice())?;
            by_tag.insert((tap.tag_id.as_str(), tap.id.as_str()), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Count all recorded taps.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count_total(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let taps = read_txn.open_table(TAPS)?;
        let mut count = 0u64;
        for item in taps.iter()? {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Count taps recorded for one tag.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count_for_tag(&self, tag_id: &str) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let by_tag = read_txn.open_table(TAPS_BY_TAG)?;
        let mut count = 0u64;
        for item in by_tag.range((tag_id, "")..=(tag_id, "\u{10FFFF}"))? {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Per-tag tap totals for all provided tags, most tapped first.
    ///
    /// Tags with no taps are included with a zero count so the analytics view
    /// shows the full inventory.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn summary(&self, tags: &[Tag]) -> Result<Vec<TagTapSummary>, AppError> {
        let read_txn = self.db.begin_read()?;
        let by_tag = read_txn.open_table(TAPS_BY_TAG)?;
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for item in by_tag.iter()? {
            let (key, _) = item?;
            let (tag_id, _) = key.value();
            if let Some(tag) = tags.iter().find(|tag| tag.id == tag_id) {
                *counts.entry(tag.id.as_str()).or_insert(0) += 1;
            }
        }
        let mut rows: Vec<TagTapSummary> = tags
            .iter()
            .map(|tag| TagTapSummary {
                tag_id: tag.id.clone(),
                tag_name: tag.name.clone(),
                tag_uid: tag.tag_uid.clone(),
                tap_count: counts.get(tag.id.as_str()).copied().unwrap_or(0),
            })
            .collect();
        rows.sort_by(|a, b| b.tap_count.cmp(&a.tap_count).then(a.tag_name.cmp(&b.tag_name)));
        Ok(rows)
    }
}
