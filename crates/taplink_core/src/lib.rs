//! Core domain library for TapLink (config, storage, content model).

/// Configuration loading and defaults.
pub mod config;
/// Block-based page content: registry, codec, editor, renderer, resolver.
pub mod content;
/// Database access layer and transactions.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Data models for API requests and persistence.
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, DEFAULT_PORT};
pub use content::{
    codec, Component, ComponentKind, ComponentRegistry, DecodeError, Document, DocumentEditor,
    EditError, RenderedNode, Renderer, Resolution, ResolvedContent, TagLookup,
};
pub use db::Database;
pub use error::AppError;
