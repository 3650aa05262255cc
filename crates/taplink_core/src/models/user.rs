//! Editor account models and password hashing.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const HASH_VERSION: &str = "b3v1";

/// Editor account stored in the database. Never returned from the API
/// directly; handlers project through [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Request payload for registering an editor account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request payload for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl User {
    /// Create a new account with a freshly salted password hash.
    ///
    /// # Arguments
    /// - `name`: Display name.
    /// - `email`: Login email, stored lowercased.
    /// - `password`: Plaintext password, hashed before storage.
    ///
    /// # Returns
    /// A new [`User`] instance.
    pub fn new(name: String, email: &str, password: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.trim().to_ascii_lowercase(),
            password_hash: hash_password(password),
            created_at: Utc::now(),
        }
    }

    /// Check a login attempt against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(&self.password_hash, password)
    }
}

impl From<&User> for UserProfile {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            email: value.email.clone(),
        }
    }
}

/// Hash a password with a fresh random salt.
///
/// Stored form: `b3v1$<salt_hex>$<digest_hex>` where the digest is a keyed
/// blake3 hash of the password using the salt-derived key.
///
/// # Returns
/// The encoded hash string.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_password(&salt, password);
    format!("{}${}${}", HASH_VERSION, hex(&salt), digest.to_hex())
}

/// Verify a password against an encoded hash.
///
/// # Returns
/// `true` when the password matches; malformed hashes verify as `false`.
pub fn verify_password(encoded: &str, password: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(version), Some(salt_hex), Some(digest_hex), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if version != HASH_VERSION {
        return false;
    }
    let Some(salt) = unhex(salt_hex) else {
        return false;
    };
    let Ok(expected) = blake3::Hash::from_hex(digest_hex) else {
        return false;
    };
    // blake3::Hash equality is constant-time.
    digest_password(&salt, password) == expected
}

fn digest_password(salt: &[u8], password: &str) -> blake3::Hash {
    let key = blake3::hash(salt);
    blake3::keyed_hash(key.as_bytes(), password.as_bytes())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn unhex(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() % 2 != 0 {
        return None;
    }
    bytes
        .chunks_exact(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}
