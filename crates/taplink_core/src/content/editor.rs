//! In-memory mutable document with positional block operations.

use super::component::{Component, Document};
use super::registry::ComponentRegistry;
use serde_json::{Map, Value};
use thiserror::Error;

/// Typed failures for editor and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Type tag outside the registry's closed set.
    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),
    /// Position outside the dense `0..len` range.
    #[error("position {position} is out of range for a document of {len} component(s)")]
    IndexOutOfRange { position: usize, len: usize },
    /// Field name or value shape that does not belong to the addressed
    /// component's variant.
    #[error("field '{field}' does not match component type '{type_tag}'")]
    FieldMismatch { type_tag: String, field: String },
}

/// Mutable working copy of a page document for one editing session.
///
/// Positions are always a dense `0..n-1` range after every operation, and
/// every operation validates its inputs before mutating, so a failed call
/// leaves the document exactly as it was.
#[derive(Debug)]
pub struct DocumentEditor<'r> {
    registry: &'r ComponentRegistry,
    document: Document,
}

impl<'r> DocumentEditor<'r> {
    /// Start an editing session on an empty document.
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self::with_document(registry, Document::empty())
    }

    /// Start an editing session on an existing document.
    pub fn with_document(registry: &'r ComponentRegistry, document: Document) -> Self {
        Self { registry, document }
    }

    /// The current working document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Finish the session and take ownership of the document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Append a default-initialized block of the given kind to the end.
    ///
    /// # Arguments
    /// - `type_tag`: Wire type tag of the kind to add.
    ///
    /// # Errors
    /// [`EditError::UnknownComponentType`] when the tag is not registered.
    pub fn append(&mut self, type_tag: &str) -> Result<(), EditError> {
        let component = self.registry.default_for(type_tag)?;
        self.document.components.push(component);
        Ok(())
    }

    /// Merge partial field updates into the block at `position`, preserving
    /// its type tag.
    ///
    /// All fields are validated against the variant's schema before any of
    /// them is applied; on error the document is unchanged.
    ///
    /// # Arguments
    /// - `position`: Zero-based block position.
    /// - `fields`: Partial field map (wire field names).
    ///
    /// # Errors
    /// - [`EditError::IndexOutOfRange`] when the position is invalid.
    /// - [`EditError::FieldMismatch`] when a field name or value shape does
    ///   not belong to the block's variant.
    /// - [`EditError::UnknownComponentType`] when the addressed block is a
    ///   preserved unknown-typed object, which has no editable schema.
    pub fn update_at(
        &mut self,
        position: usize,
        fields: &Map<String, Value>,
    ) -> Result<(), EditError> {
        let len = self.document.len();
        let current = self
            .document
            .components
            .get(position)
            .ok_or(EditError::IndexOutOfRange { position, len })?;
        let merged = merge_fields(current, fields)?;
        self.document.components[position] = merged;
        Ok(())
    }

    /// Delete the block at `position`, shifting later blocks down by one.
    ///
    /// # Returns
    /// The removed component.
    ///
    /// # Errors
    /// [`EditError::IndexOutOfRange`] when the position is invalid.
    pub fn remove_at(&mut self, position: usize) -> Result<Component, EditError> {
        let len = self.document.len();
        if position >= len {
            return Err(EditError::IndexOutOfRange { position, len });
        }
        Ok(self.document.components.remove(position))
    }

    /// Relocate the block at `from` to `to`, shifting intermediate blocks.
    ///
    /// Moving a block to its current position is a no-op, not an error.
    ///
    /// # Errors
    /// [`EditError::IndexOutOfRange`] when either position is invalid; the
    /// document is unchanged on error.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        let len = self.document.len();
        for position in [from, to] {
            if position >= len {
                return Err(EditError::IndexOutOfRange { position, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let component = self.document.components.remove(from);
        self.document.components.insert(to, component);
        Ok(())
    }
}

/// Build the merged copy of `current` with `fields` applied.
///
/// Validation happens against the fully constructed copy, so a mismatch on
/// the last field is just as atomic as one on the first.
fn merge_fields(current: &Component, fields: &Map<String, Value>) -> Result<Component, EditError> {
    match current {
        Component::HeroSection {
            title,
            description,
            bg_color,
        } => {
            let mut title = title.clone();
            let mut description = description.clone();
            let mut bg_color = bg_color.clone();
            for (field, value) in fields {
                match field.as_str() {
                    "title" => title = expect_string("HeroSection", field, value)?,
                    "description" => description = expect_string("HeroSection", field, value)?,
                    "bgColor" => bg_color = expect_string("HeroSection", field, value)?,
                    _ => return Err(mismatch("HeroSection", field)),
                }
            }
            Ok(Component::HeroSection {
                title,
                description,
                bg_color,
            })
        }
        Component::TextBlock { content } => {
            let mut content = content.clone();
            for (field, value) in fields {
                match field.as_str() {
                    "content" => content = expect_string("TextBlock", field, value)?,
                    _ => return Err(mismatch("TextBlock", field)),
                }
            }
            Ok(Component::TextBlock { content })
        }
        Component::Spacer { height } => {
            let mut height = *height;
            for (field, value) in fields {
                match field.as_str() {
                    "height" => {
                        height = value
                            .as_u64()
                            .and_then(|v| u32::try_from(v).ok())
                            .filter(|v| *v > 0)
                            .ok_or_else(|| mismatch("Spacer", field))?;
                    }
                    _ => return Err(mismatch("Spacer", field)),
                }
            }
            Ok(Component::Spacer { height })
        }
        Component::Unknown(raw) => Err(EditError::UnknownComponentType(
            raw.type_tag().unwrap_or("<missing type>").to_string(),
        )),
    }
}

fn expect_string(type_tag: &str, field: &str, value: &Value) -> Result<String, EditError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(type_tag, field))
}

fn mismatch(type_tag: &str, field: &str) -> EditError {
    EditError::FieldMismatch {
        type_tag: type_tag.to_string(),
        field: field.to_string(),
    }
}
