//! Component variants and the ordered document container.

use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// One typed content block within a page document.
///
/// The wire form is a JSON object tagged on `"type"`; the named variants form
/// the closed authoring set. Objects with an unrecognized type tag decode into
/// [`Component::Unknown`] so stored documents survive round-trips and the
/// renderer can isolate the failure to a single block. Unknown extra fields on
/// known variants are ignored on decode for forward compatibility.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Full-width banner with a heading, supporting text, and a background.
    HeroSection {
        title: String,
        description: String,
        /// Either a hex color (`#F0F4F8`) or a styling class name.
        bg_color: String,
    },
    /// Rich text body; `content` is author-provided markup injected verbatim
    /// at render time (see the renderer's trust-boundary notes).
    TextBlock { content: String },
    /// Vertical gap on the layout spacing scale (quarter-rem units).
    Spacer { height: u32 },
    /// Preserved raw object for any type tag outside the closed set.
    Unknown(UnknownComponent),
}

impl Component {
    /// The component's type tag as stored on the wire.
    ///
    /// # Returns
    /// The tag string, or `None` for an unknown block whose raw object
    /// carries no usable `"type"` field.
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            Component::HeroSection { .. } => Some(ComponentKind::HeroSection.as_str()),
            Component::TextBlock { .. } => Some(ComponentKind::TextBlock.as_str()),
            Component::Spacer { .. } => Some(ComponentKind::Spacer.as_str()),
            Component::Unknown(raw) => raw.type_tag(),
        }
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Component::HeroSection {
                title,
                description,
                bg_color,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("type", ComponentKind::HeroSection.as_str())?;
                map.serialize_entry("title", title)?;
                map.serialize_entry("description", description)?;
                map.serialize_entry("bgColor", bg_color)?;
                map.end()
            }
            Component::TextBlock { content } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", ComponentKind::TextBlock.as_str())?;
                map.serialize_entry("content", content)?;
                map.end()
            }
            Component::Spacer { height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", ComponentKind::Spacer.as_str())?;
                map.serialize_entry("height", height)?;
                map.end()
            }
            Component::Unknown(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Component {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .and_then(ComponentKind::parse);
        match kind {
            Some(ComponentKind::HeroSection) => Ok(Component::HeroSection {
                title: string_field::<D>(&raw, "HeroSection", "title")?,
                description: string_field::<D>(&raw, "HeroSection", "description")?,
                bg_color: string_field::<D>(&raw, "HeroSection", "bgColor")?,
            }),
            Some(ComponentKind::TextBlock) => Ok(Component::TextBlock {
                content: string_field::<D>(&raw, "TextBlock", "content")?,
            }),
            Some(ComponentKind::Spacer) => {
                let height = raw
                    .get("height")
                    .and_then(Value::as_u64)
                    .and_then(|value| u32::try_from(value).ok())
                    .ok_or_else(|| {
                        D::Error::custom("Spacer.height must be a non-negative integer")
                    })?;
                Ok(Component::Spacer { height })
            }
            // Anything outside the closed set is carried verbatim; the
            // renderer turns it into a visible error node.
            None => Ok(Component::Unknown(UnknownComponent(raw))),
        }
    }
}

fn string_field<'de, D: Deserializer<'de>>(
    raw: &Map<String, Value>,
    type_tag: &str,
    field: &str,
) -> Result<String, D::Error> {
    raw.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| D::Error::custom(format!("{}.{} must be a string", type_tag, field)))
}

/// Raw JSON object preserved for a component of an unrecognized type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownComponent(pub Map<String, Value>);

impl UnknownComponent {
    /// The raw object's `"type"` field, when present and a string.
    pub fn type_tag(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }
}

/// Identifier for one of the registered component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    HeroSection,
    TextBlock,
    Spacer,
}

impl ComponentKind {
    /// All registered kinds, in UI enumeration order.
    pub const ALL: [ComponentKind; 3] = [
        ComponentKind::HeroSection,
        ComponentKind::TextBlock,
        ComponentKind::Spacer,
    ];

    /// Wire type tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::HeroSection => "HeroSection",
            ComponentKind::TextBlock => "TextBlock",
            ComponentKind::Spacer => "Spacer",
        }
    }

    /// Parse a wire type tag.
    ///
    /// # Returns
    /// The matching kind, or `None` when the tag is not registered.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "HeroSection" => Some(ComponentKind::HeroSection),
            "TextBlock" => Some(ComponentKind::TextBlock),
            "Spacer" => Some(ComponentKind::Spacer),
            _ => None,
        }
    }

    /// Human-readable label for editor UI enumeration.
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::HeroSection => "Hero Section",
            ComponentKind::TextBlock => "Text Block",
            ComponentKind::Spacer => "Spacer",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered sequence of components composing a page's content.
///
/// Render order is array order; the empty document is a valid blank page.
/// This struct is also the durable serialized shape: it (de)serializes as
/// `{"components": [...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Document {
    /// An empty document (valid blank page).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of components in the document.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the document has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate components in render order.
    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }
}

impl From<Vec<Component>> for Document {
    fn from(components: Vec<Component>) -> Self {
        Self { components }
    }
}
