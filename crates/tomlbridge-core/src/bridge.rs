//! Document-level operations: TOML text in, typed values out, and back.
//!
//! These compose the adapter, the converters and the content identity into
//! the three calls a host makes: decode a document, encode a value, and read
//! a file's content together with its fingerprint.

use crate::diagnostics::Direction;
use crate::document;
use crate::error::Result;
use crate::identity::Fingerprint;
use crate::typed::TypedValue;
use crate::{decode, encode};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Interpret TOML text as a typed value.
///
/// Returns [`BridgeError::Parse`](crate::BridgeError::Parse) if the text is
/// not TOML, and [`BridgeError::Conversion`](crate::BridgeError::Conversion)
/// with every diagnostic if any value could not be converted.
pub fn decode_document(text: &str) -> Result<TypedValue> {
    let document = document::parse(text)?;
    decode(&document).into_result(Direction::Decode)
}

/// Encode a typed value as TOML text.
///
/// Returns [`BridgeError::Encode`](crate::BridgeError::Encode) with every
/// diagnostic if the value cannot be represented, or
/// [`BridgeError::Render`](crate::BridgeError::Render) if the TOML renderer
/// rejects the result (for example a top-level value that is not an object).
pub fn encode_document(value: &TypedValue) -> Result<String> {
    let document = encode(value).into_result(Direction::Encode)?;
    document::render(&document)
}

/// The decoded content of a TOML file, with its JSON form and identity.
#[derive(Debug, Clone, PartialEq)]
pub struct TomlFile {
    /// Raw TOML text, as given.
    pub input: String,
    /// Decoded content.
    pub content: TypedValue,
    /// Canonical JSON of the content (keys sorted, compact).
    pub content_json: String,
    /// Hex SHA-1 of `content_json`.
    pub id: String,
}

impl TomlFile {
    /// Parse and decode `input`, fingerprinting the parsed tree.
    pub fn read(input: impl Into<String>) -> Result<Self> {
        let input = input.into();
        let document = document::parse(&input)?;
        let fingerprint = Fingerprint::of(&document)?;
        let content = decode(&document).into_result(Direction::Decode)?;
        tracing::debug!(id = %fingerprint.id, "read TOML file");
        Ok(Self {
            input,
            content,
            content_json: fingerprint.json,
            id: fingerprint.id,
        })
    }
}

impl Serialize for TomlFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let content = self.content.to_json().map_err(serde::ser::Error::custom)?;
        let mut state = serializer.serialize_struct("TomlFile", 4)?;
        state.serialize_field("input", &self.input)?;
        state.serialize_field("content", &content)?;
        state.serialize_field("content_json", &self.content_json)?;
        state.serialize_field("id", &self.id)?;
        state.end()
    }
}
