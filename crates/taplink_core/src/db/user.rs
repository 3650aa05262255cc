//! Editor account storage operations backed by redb.

use crate::db::tables::*;
use crate::error::AppError;
use crate::models::user::User;
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for user-related redb tables.
pub struct UserDb {
    db: Arc<redb::Database>,
}

pub(crate) fn deserialize_user(bytes: &[u8]) -> Result<User, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

impl UserDb {
    /// Initialize user tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(USERS)?;
        write_txn.open_table(USERS_BY_EMAIL)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new account with a unique email.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the email is already registered,
    /// or a storage error otherwise.
    pub fn create(&self, user: &User) -> Result<(), AppError> {
        let encoded = bincode::serialize(user)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let mut emails = write_txn.open_table(USERS_BY_EMAIL)?;

            if emails.get(user.email.as_str())?.is_some() {
                return Err(AppError::Conflict(
                    "A user with this email already exists".to_string(),
                ));
            }

            users.insert(user.id.as_str(), encoded.as_slice())?;
            emails.insert(user.email.as_str(), user.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch an account by login email (lowercased).
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let normalized = email.trim().to_ascii_lowercase();
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(USERS_BY_EMAIL)?;
        let Some(id_guard) = emails.get(normalized.as_str())? else {
            return Ok(None);
        };
        let id = id_guard.value().to_string();
        drop(id_guard);
        let users = read_txn.open_table(USERS)?;
        match users.get(id.as_str())? {
            Some(value) => Ok(Some(deserialize_user(value.value())?)),
            None => Ok(None),
        }
    }

    /// Fetch an account by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        match users.get(id)? {
            Some(value) => Ok(Some(deserialize_user(value.value())?)),
            None => Ok(None),
        }
    }

    /// Count all accounts.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        let mut count = 0u64;
        for item in users.iter()? {
            item?;
            count += 1;
        }
        Ok(count)
    }
}
