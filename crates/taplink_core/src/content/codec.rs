//! Serialization of documents to and from the stored JSON form.
//!
//! The durable on-disk contract is a JSON object with a single `"components"`
//! field holding the ordered array of tagged component objects. Decoding is
//! defensive: malformed stored content becomes a typed error value, never a
//! panic, because page renderers fall back to a placeholder on error.

use super::component::{Component, Document};
use crate::error::AppError;
use serde_json::Value;
use thiserror::Error;

/// Typed decode failures for stored page content.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input is not parseable as JSON at all.
    #[error("malformed content: {0}")]
    Malformed(String),
    /// Input is valid JSON but not the document shape.
    #[error("invalid content shape: {0}")]
    InvalidShape(String),
}

/// Encode a document into its stored string form.
///
/// Round-trip law: `decode(&encode(d)?)` reproduces `d` for every valid
/// document, including preserved unknown blocks.
///
/// # Errors
/// Propagates the (practically unreachable) JSON serialization failure.
pub fn encode(document: &Document) -> Result<String, AppError> {
    Ok(serde_json::to_string(document)?)
}

/// Decode stored page content into a [`Document`].
///
/// Blank input is a valid empty document, as is a JSON object without a
/// `"components"` field. Unknown extra fields on known components are ignored
/// for forward compatibility; objects with an unrecognized type tag are
/// preserved as [`Component::Unknown`].
///
/// # Errors
/// - [`DecodeError::Malformed`] when the input is not valid JSON.
/// - [`DecodeError::InvalidShape`] when `"components"` is not an array, an
///   element is not an object, or an element has no string `"type"` tag.
pub fn decode(raw: &str) -> Result<Document, DecodeError> {
    if raw.trim().is_empty() {
        return Ok(Document::empty());
    }

    let value: Value =
        serde_json::from_str(raw).map_err(|err| DecodeError::Malformed(err.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(DecodeError::InvalidShape(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let elements = match object.get("components") {
        None | Some(Value::Null) => return Ok(Document::empty()),
        Some(Value::Array(elements)) => elements,
        Some(other) => {
            return Err(DecodeError::InvalidShape(format!(
                "\"components\" must be an array, got {}",
                json_type_name(other)
            )))
        }
    };

    let mut components = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        components.push(decode_component(index, element)?);
    }
    Ok(Document { components })
}

fn decode_component(index: usize, element: &Value) -> Result<Component, DecodeError> {
    let object = element.as_object().ok_or_else(|| {
        DecodeError::InvalidShape(format!(
            "component {} must be an object, got {}",
            index,
            json_type_name(element)
        ))
    })?;

    if !object.get("type").map(Value::is_string).unwrap_or(false) {
        return Err(DecodeError::InvalidShape(format!(
            "component {} is missing its string \"type\" tag",
            index
        )));
    }

    // A known tag with the wrong field shapes is a shape error; an unknown
    // tag falls through to the preserved Unknown variant inside serde.
    serde_json::from_value(element.clone()).map_err(|err| {
        DecodeError::InvalidShape(format!("component {} does not match its type: {}", index, err))
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
