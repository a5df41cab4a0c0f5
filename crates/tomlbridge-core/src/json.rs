//! Generic JSON view of typed values, for hosts without a native dynamic type.
//!
//! JSON numbers carry no integer/float tag, so they come in as the generic
//! [`TypedValue::Number`] and get classified by value when encoded to TOML.

use crate::encode::whole_f64_as_i64;
use crate::error::{BridgeError, Result};
use crate::typed::TypedValue;
use serde_json::{Map, Number, Value};

impl TypedValue {
    /// Build a typed value from generic JSON: arrays become tuples, objects
    /// become objects, and every number becomes a generic `Number`. Integer
    /// literals keep their exact value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => TypedValue::Null,
            Value::Bool(b) => TypedValue::Bool(*b),
            Value::Number(n) => TypedValue::Number(n.clone()),
            Value::String(s) => TypedValue::String(s.clone()),
            Value::Array(items) => TypedValue::Tuple(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => TypedValue::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Render as generic JSON. `Dynamic` wrappers disappear; whole `Number`s
    /// in i64 range are written as integers.
    pub fn to_json(&self) -> Result<Value> {
        Ok(match self.unwrap_dynamic() {
            TypedValue::Null => Value::Null,
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Int64(i) => Value::from(*i),
            TypedValue::Float64(f) => float_to_json(*f)?,
            TypedValue::Number(n) if n.is_f64() => {
                let f = n.as_f64().unwrap_or(f64::NAN);
                match whole_f64_as_i64(f) {
                    Some(i) => Value::from(i),
                    None => float_to_json(f)?,
                }
            }
            TypedValue::Number(n) => Value::Number(n.clone()),
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Tuple(elements)
            | TypedValue::List { elements, .. }
            | TypedValue::Set { elements, .. } => Value::Array(
                elements
                    .iter()
                    .map(TypedValue::to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            TypedValue::Object(entries) | TypedValue::Map { entries, .. } => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                Value::Object(map)
            }
            TypedValue::Unknown(ty) => {
                return Err(BridgeError::Interchange(format!(
                    "the {ty} value is not known yet"
                )))
            }
            TypedValue::Dynamic(inner) => inner.to_json()?,
        })
    }
}

fn float_to_json(f: f64) -> Result<Value> {
    Number::from_f64(f).map(Value::Number).ok_or_else(|| {
        BridgeError::Interchange(format!("float value {f} has no JSON representation"))
    })
}
