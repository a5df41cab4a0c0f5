//! Content identity: canonical JSON plus a SHA-1 fingerprint.
//!
//! The canonical form is compact JSON with object keys in byte order and
//! arrays in document order. Integers are JSON integers, floats are JSON
//! floats, and datetimes use the same strings the decoder produces. The
//! identity is the lowercase hex SHA-1 of exactly those bytes, so a host that
//! stores both can always recompute one from the other.
//!
//! The digest is a change-detection fingerprint, not a security credential.

use crate::document::DocumentValue;
use crate::error::{BridgeError, Result};
use serde_json::{Map, Number, Value};
use sha1::{Digest, Sha1};

/// Canonical JSON text and its identity, computed from the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub json: String,
    pub id: String,
}

impl Fingerprint {
    pub fn of(value: &DocumentValue) -> Result<Self> {
        let json = canonical_json(value)?;
        let id = digest(json.as_bytes());
        tracing::trace!(%id, bytes = json.len(), "computed content identity");
        Ok(Self { json, id })
    }
}

/// Identity string of a document tree: 40 lowercase hex characters.
pub fn identity(value: &DocumentValue) -> Result<String> {
    Fingerprint::of(value).map(|fingerprint| fingerprint.id)
}

/// Compact, key-sorted JSON rendering of a document tree.
///
/// Fails with [`BridgeError::Interchange`] for values JSON cannot carry
/// faithfully: non-finite floats and datetimes that don't name a real instant.
pub fn canonical_json(value: &DocumentValue) -> Result<String> {
    Ok(serde_json::to_string(&to_json(value)?)?)
}

/// Hex-encoded SHA-1 of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

fn to_json(value: &DocumentValue) -> Result<Value> {
    Ok(match value {
        DocumentValue::Null => Value::Null,
        DocumentValue::String(s) => Value::String(s.clone()),
        DocumentValue::Integer(i) => Value::from(*i),
        DocumentValue::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
            BridgeError::Interchange(format!("float value {f} has no JSON representation"))
        })?,
        DocumentValue::Boolean(b) => Value::Bool(*b),
        DocumentValue::OffsetDateTime(dt)
        | DocumentValue::LocalDateTime(dt)
        | DocumentValue::LocalDate(dt)
        | DocumentValue::LocalTime(dt) => {
            let rendered = value
                .as_temporal()
                .and_then(|(kind, datetime)| kind.render(datetime));
            match rendered {
                Some(s) => Value::String(s),
                None => {
                    return Err(BridgeError::Interchange(format!(
                        "{dt} is not a valid {}",
                        value.kind()
                    )))
                }
            }
        }
        DocumentValue::Array(items) => {
            Value::Array(items.iter().map(to_json).collect::<Result<Vec<_>>>()?)
        }
        DocumentValue::Table(entries) => {
            // BTreeMap iteration is byte-ordered; the order-preserving map keeps it.
            let mut map = Map::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(key.clone(), to_json(value)?);
            }
            Value::Object(map)
        }
    })
}
