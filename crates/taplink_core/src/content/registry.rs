//! Registry of component kinds, their field schemas, and default values.

use super::component::{Component, ComponentKind};
use super::editor::EditError;
use serde::Serialize;

/// Expected shape of a single component field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain text, escaped on render.
    Text,
    /// Author-provided markup, injected verbatim on render.
    Markup,
    /// Positive integer on the layout spacing scale.
    Integer,
}

/// Schema entry for one field of a component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const HERO_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "title",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "description",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "bgColor",
        kind: FieldKind::Text,
    },
];

const TEXT_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "content",
    kind: FieldKind::Markup,
}];

const SPACER_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "height",
    kind: FieldKind::Integer,
}];

/// One registered component kind with its UI label and field schema.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    pub kind: ComponentKind,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Closed set of known component kinds.
///
/// Constructed once at process start and passed by reference into the editor
/// and renderer; there is no ambient global registry.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Build the registry with the built-in component kinds.
    pub fn new() -> Self {
        let entries = ComponentKind::ALL
            .iter()
            .map(|&kind| RegistryEntry {
                kind,
                label: kind.label(),
                fields: match kind {
                    ComponentKind::HeroSection => HERO_FIELDS,
                    ComponentKind::TextBlock => TEXT_FIELDS,
                    ComponentKind::Spacer => SPACER_FIELDS,
                },
            })
            .collect();
        Self { entries }
    }

    /// Enumerate registered kinds in UI order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Whether a wire type tag names a registered kind.
    pub fn contains(&self, type_tag: &str) -> bool {
        ComponentKind::parse(type_tag)
            .map(|kind| self.entries.iter().any(|entry| entry.kind == kind))
            .unwrap_or(false)
    }

    /// Field schema for a registered kind.
    ///
    /// # Returns
    /// The field specs, or `None` when the tag is not registered.
    pub fn fields(&self, type_tag: &str) -> Option<&'static [FieldSpec]> {
        let kind = ComponentKind::parse(type_tag)?;
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.fields)
    }

    /// Canonical default-initialized value for a kind, used when a new block
    /// is added in the editor.
    ///
    /// # Arguments
    /// - `type_tag`: Wire type tag of the kind to instantiate.
    ///
    /// # Returns
    /// The default component value.
    ///
    /// # Errors
    /// [`EditError::UnknownComponentType`] when the tag is not registered.
    /// This is a programming/data error, not user input, and is never
    /// silently swallowed.
    pub fn default_for(&self, type_tag: &str) -> Result<Component, EditError> {
        let kind = ComponentKind::parse(type_tag)
            .filter(|_| self.contains(type_tag))
            .ok_or_else(|| EditError::UnknownComponentType(type_tag.to_string()))?;
        Ok(match kind {
            ComponentKind::HeroSection => Component::HeroSection {
                title: "New Hero Title".to_string(),
                description: "Enter a compelling description.".to_string(),
                bg_color: "#FFFFFF".to_string(),
            },
            ComponentKind::TextBlock => Component::TextBlock {
                content: "Start typing your body content here.".to_string(),
            },
            ComponentKind::Spacer => Component::Spacer { height: 16 },
        })
    }

    /// Validate that a component value matches its variant's required shape.
    ///
    /// The variant tag is authoritative: field presence is enforced by the
    /// type itself, so validation covers value constraints and unknown tags.
    ///
    /// # Errors
    /// - [`EditError::UnknownComponentType`] for an unregistered tag.
    /// - [`EditError::FieldMismatch`] when a field value is out of range for
    ///   its variant (for example a zero spacer height).
    pub fn validate(&self, component: &Component) -> Result<(), EditError> {
        match component {
            Component::HeroSection { .. } | Component::TextBlock { .. } => Ok(()),
            Component::Spacer { height } => {
                if *height == 0 {
                    return Err(EditError::FieldMismatch {
                        type_tag: ComponentKind::Spacer.as_str().to_string(),
                        field: "height".to_string(),
                    });
                }
                Ok(())
            }
            Component::Unknown(raw) => Err(EditError::UnknownComponentType(
                raw.type_tag().unwrap_or("<missing type>").to_string(),
            )),
        }
    }
}
