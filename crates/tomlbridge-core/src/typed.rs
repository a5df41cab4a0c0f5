//! Typed values: the host runtime's side of the bridge.
//!
//! Decoding only ever produces the structural shapes (`Tuple`, `Object`) and
//! the four scalar kinds. Hosts may hand the encoder a few more shapes they
//! use natively: collections with a declared element type (`List`, `Set`,
//! `Map`), a generic `Number` without an integer/float tag, and `Unknown`
//! placeholders for values that are not computed yet.

use serde::Serialize;
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

/// Static type of a [`TypedValue`], in the host's type vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum TypeDescriptor {
    String,
    Int64,
    Float64,
    Number,
    Bool,
    List(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    Object(BTreeMap<String, TypeDescriptor>),
    /// Any type; the concrete type is carried by the value itself.
    Dynamic,
}

impl TypeDescriptor {
    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::List(Box::new(element))
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::Set(Box::new(element))
    }

    pub fn map(element: TypeDescriptor) -> Self {
        TypeDescriptor::Map(Box::new(element))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::String => f.write_str("string"),
            TypeDescriptor::Int64 => f.write_str("int64"),
            TypeDescriptor::Float64 => f.write_str("float64"),
            TypeDescriptor::Number => f.write_str("number"),
            TypeDescriptor::Bool => f.write_str("bool"),
            TypeDescriptor::List(element) => write!(f, "list({element})"),
            TypeDescriptor::Set(element) => write!(f, "set({element})"),
            TypeDescriptor::Map(element) => write!(f, "map({element})"),
            TypeDescriptor::Tuple(elements) => {
                f.write_str("tuple([")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("])")
            }
            TypeDescriptor::Object(attributes) => {
                f.write_str("object({")?;
                for (i, (name, ty)) in attributes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={ty}")?;
                }
                f.write_str("})")
            }
            TypeDescriptor::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// A host value tagged with its type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Absence of a value.
    Null,
    String(String),
    Int64(i64),
    Float64(f64),
    /// A number with no integer/float tag; classified by value on encode.
    /// Integers are held exactly, whatever their magnitude within 64 bits.
    Number(Number),
    Bool(bool),
    /// Heterogeneous ordered sequence; each element carries its own type.
    Tuple(Vec<TypedValue>),
    /// Attribute name to value; each attribute carries its own type.
    Object(BTreeMap<String, TypedValue>),
    List {
        element_type: TypeDescriptor,
        elements: Vec<TypedValue>,
    },
    Set {
        element_type: TypeDescriptor,
        elements: Vec<TypedValue>,
    },
    Map {
        element_type: TypeDescriptor,
        entries: BTreeMap<String, TypedValue>,
    },
    /// Hides the static type of the wrapped value until it is unwrapped.
    Dynamic(Box<TypedValue>),
    /// A value the host has not computed yet.
    Unknown(TypeDescriptor),
}

impl TypedValue {
    pub fn string(s: impl Into<String>) -> Self {
        TypedValue::String(s.into())
    }

    pub fn dynamic(inner: TypedValue) -> Self {
        TypedValue::Dynamic(Box::new(inner))
    }

    pub fn object<K, I>(attributes: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TypedValue)>,
    {
        TypedValue::Object(
            attributes
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Strip any number of `Dynamic` wrappers.
    pub fn unwrap_dynamic(&self) -> &TypedValue {
        let mut value = self;
        while let TypedValue::Dynamic(inner) = value {
            value = inner;
        }
        value
    }

    /// The static type of this value. `Null` has no type of its own and
    /// reports `Dynamic`, as does any `Dynamic` wrapper.
    pub fn type_of(&self) -> TypeDescriptor {
        match self {
            TypedValue::Null | TypedValue::Dynamic(_) => TypeDescriptor::Dynamic,
            TypedValue::String(_) => TypeDescriptor::String,
            TypedValue::Int64(_) => TypeDescriptor::Int64,
            TypedValue::Float64(_) => TypeDescriptor::Float64,
            TypedValue::Number(_) => TypeDescriptor::Number,
            TypedValue::Bool(_) => TypeDescriptor::Bool,
            TypedValue::Tuple(elements) => {
                TypeDescriptor::Tuple(elements.iter().map(TypedValue::type_of).collect())
            }
            TypedValue::Object(attributes) => TypeDescriptor::Object(
                attributes
                    .iter()
                    .map(|(name, value)| (name.clone(), value.type_of()))
                    .collect(),
            ),
            TypedValue::List { element_type, .. } => TypeDescriptor::list(element_type.clone()),
            TypedValue::Set { element_type, .. } => TypeDescriptor::set(element_type.clone()),
            TypedValue::Map { element_type, .. } => TypeDescriptor::map(element_type.clone()),
            TypedValue::Unknown(ty) => ty.clone(),
        }
    }

    /// Shallow name of the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::String(_) => "string",
            TypedValue::Int64(_) => "int64",
            TypedValue::Float64(_) => "float64",
            TypedValue::Number(_) => "number",
            TypedValue::Bool(_) => "bool",
            TypedValue::Tuple(_) => "tuple",
            TypedValue::Object(_) => "object",
            TypedValue::List { .. } => "list",
            TypedValue::Set { .. } => "set",
            TypedValue::Map { .. } => "map",
            TypedValue::Dynamic(_) => "dynamic",
            TypedValue::Unknown(_) => "unknown",
        }
    }

    /// Whether this value's outermost shape fits `declared`. Only one level is
    /// checked; the encoder repeats the check as it descends.
    pub(crate) fn fits(&self, declared: &TypeDescriptor) -> bool {
        match (declared, self) {
            (TypeDescriptor::Dynamic, _) => true,
            (_, TypedValue::Null) => true,
            (expected, TypedValue::Unknown(actual)) => expected == actual,
            (TypeDescriptor::String, TypedValue::String(_))
            | (TypeDescriptor::Int64, TypedValue::Int64(_))
            | (TypeDescriptor::Float64, TypedValue::Float64(_))
            | (TypeDescriptor::Number, TypedValue::Number(_))
            | (TypeDescriptor::Bool, TypedValue::Bool(_)) => true,
            (TypeDescriptor::List(expected), TypedValue::List { element_type, .. })
            | (TypeDescriptor::Set(expected), TypedValue::Set { element_type, .. })
            | (TypeDescriptor::Map(expected), TypedValue::Map { element_type, .. }) => {
                **expected == *element_type
            }
            (TypeDescriptor::Tuple(expected), TypedValue::Tuple(elements)) => {
                expected.len() == elements.len()
            }
            (TypeDescriptor::Object(expected), TypedValue::Object(attributes)) => {
                expected.len() == attributes.len()
                    && expected.keys().zip(attributes.keys()).all(|(a, b)| a == b)
            }
            _ => false,
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Int64(i)
    }
}

impl From<f64> for TypedValue {
    fn from(f: f64) -> Self {
        TypedValue::Float64(f)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}
