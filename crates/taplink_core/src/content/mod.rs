//! Block-based page content model.
//!
//! A page's content is an ordered [`Document`] of typed [`Component`] blocks.
//! The closed set of block kinds lives in the [`ComponentRegistry`], the
//! [`codec`] turns documents into the durable JSON form and back, the
//! [`DocumentEditor`] applies positional mutations, the [`Renderer`] maps a
//! stored document to HTML, and [`resolve`] maps a physical tag UID to its
//! assigned content.

/// Serialization of documents to/from the stored JSON form.
pub mod codec;
/// Typed component variants and the document container.
pub mod component;
/// In-memory mutable document with positional operations.
pub mod editor;
/// Registry of known component kinds, defaults, and field schemas.
pub mod registry;
/// HTML rendering of stored documents.
pub mod render;
/// Tag UID to page-content resolution.
pub mod resolve;


pub use codec::DecodeError;
pub use component::{Component, ComponentKind, Document, UnknownComponent};
pub use editor::{DocumentEditor, EditError};
pub use registry::{ComponentRegistry, FieldKind, FieldSpec};
pub use render::{render_not_found, render_unassigned, RenderedNode, Renderer};
pub use resolve::{resolve, Resolution, ResolvedContent, TagLookup};
