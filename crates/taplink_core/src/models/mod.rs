//! Data models for API requests and persistence.

/// Content page entity and request payloads.
pub mod page;
/// NFC tag entity and request payloads.
pub mod tag;
/// Tap analytics records.
pub mod tap;
/// Editor account entity and auth payloads.
pub mod user;

#[cfg(test)]
mod tests;
