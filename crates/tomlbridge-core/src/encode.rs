//! Encode converter: typed value tree → document tree.
//!
//! | Typed value            | TOML type                                    |
//! |------------------------|----------------------------------------------|
//! | `String`               | `String`                                     |
//! | `Int64`                | `Integer`                                    |
//! | `Float64`              | `Float`                                      |
//! | `Number`               | `Integer` if whole number, `Float` otherwise |
//! | `Bool`                 | `Boolean`                                    |
//! | `List`, `Set`, `Tuple` | `Array`                                      |
//! | `Map`, `Object`        | `Table`                                      |
//! | `Dynamic`              | whatever the wrapped value encodes to        |
//! | `Null`                 | absent from the result                       |
//!
//! TOML cannot represent every typed value (and vice versa), so decoding the
//! result of an encode does not always give back the same value.
//!
//! Values that cannot be encoded (unknown placeholders, collection elements
//! that disagree with the declared element type, sets with duplicates) are
//! reported as error diagnostics. The walk continues past them so a single
//! call reports every fault in the tree.

use crate::diagnostics::{Converted, Diagnostics};
use crate::document::DocumentValue;
use crate::typed::{TypeDescriptor, TypedValue};
use serde_json::Number;
use std::collections::{btree_map, BTreeMap};
use std::fmt::Write as _;
use std::slice;

static DYNAMIC: TypeDescriptor = TypeDescriptor::Dynamic;

/// Convert a typed value into a document tree, collecting every diagnostic.
///
/// Null attributes and elements are dropped from their container, so the
/// result may hold fewer entries than the input. A root `Null` encodes to
/// [`DocumentValue::Null`].
pub fn encode(value: &TypedValue) -> Converted<DocumentValue> {
    let mut diagnostics = Diagnostics::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut next = Some((value, &DYNAMIC));

    loop {
        let mut finished = next
            .take()
            .and_then(|(value, declared)| descend(value, declared, &mut stack, &mut diagnostics));

        loop {
            let Some(frame) = stack.last_mut() else {
                let value = match finished {
                    Some(Encoded::Value(value)) => Some(value),
                    Some(Encoded::Omitted) => Some(DocumentValue::Null),
                    Some(Encoded::Failed) | None => None,
                };
                tracing::debug!(
                    errors = diagnostics.error_count(),
                    ok = value.is_some(),
                    "encoded typed value"
                );
                return Converted::new(value, diagnostics);
            };
            if let Some(result) = finished.take() {
                frame.accept(result);
            }
            if let Some(child) = frame.next_child() {
                next = Some(child);
                break;
            }
            if let Some(done) = stack.pop() {
                finished = Some(done.finish());
            }
        }
    }
}

/// Outcome of encoding one value.
enum Encoded {
    Value(DocumentValue),
    /// A null; its container leaves the slot out.
    Omitted,
    Failed,
}

/// Encode a scalar directly, or push a frame for a container. Returns `None`
/// when a frame was pushed and the value will finish later.
fn descend<'a>(
    value: &'a TypedValue,
    declared: &'a TypeDescriptor,
    stack: &mut Vec<Frame<'a>>,
    diagnostics: &mut Diagnostics,
) -> Option<Encoded> {
    let mut value = value;
    let mut declared = declared;
    loop {
        if !value.fits(declared) {
            diagnostics.add_error(
                "Value does not match its declared type",
                format!(
                    "Unable to encode {} value at {} where {declared} was declared",
                    value.kind(),
                    current_path(stack)
                ),
            );
            return Some(Encoded::Failed);
        }
        let encoded = match value {
            TypedValue::Dynamic(inner) => {
                value = inner.as_ref();
                declared = &DYNAMIC;
                continue;
            }
            TypedValue::Null => Encoded::Omitted,
            TypedValue::Unknown(ty) => {
                diagnostics.add_error(
                    "Unknown value cannot be encoded",
                    format!(
                        "The {ty} value at {} is not known yet",
                        current_path(stack)
                    ),
                );
                Encoded::Failed
            }
            TypedValue::String(s) => Encoded::Value(DocumentValue::String(s.clone())),
            TypedValue::Int64(i) => Encoded::Value(DocumentValue::Integer(*i)),
            TypedValue::Float64(f) => Encoded::Value(DocumentValue::Float(*f)),
            TypedValue::Number(n) => Encoded::Value(classify_number(n)),
            TypedValue::Bool(b) => Encoded::Value(DocumentValue::Boolean(*b)),
            TypedValue::Tuple(elements) => {
                let element_types = match declared {
                    TypeDescriptor::Tuple(types) => ElementTypes::Positional(types.as_slice()),
                    _ => ElementTypes::Uniform(&DYNAMIC),
                };
                stack.push(Frame::array(elements, element_types));
                return None;
            }
            TypedValue::List {
                element_type,
                elements,
            } => {
                stack.push(Frame::array(elements, ElementTypes::Uniform(element_type)));
                return None;
            }
            TypedValue::Set {
                element_type,
                elements,
            } => {
                let mut frame = Frame::array(elements, ElementTypes::Uniform(element_type));
                if let Some(index) = first_duplicate(elements) {
                    diagnostics.add_error(
                        "Invalid set value",
                        format!(
                            "The set at {} holds element {index} more than once",
                            current_path(stack)
                        ),
                    );
                    // Elements are still visited for their own faults.
                    frame.fail();
                }
                stack.push(frame);
                return None;
            }
            TypedValue::Object(attributes) => {
                let attribute_types = match declared {
                    TypeDescriptor::Object(types) => ElementTypes::Named(types),
                    _ => ElementTypes::Uniform(&DYNAMIC),
                };
                stack.push(Frame::table(attributes, attribute_types));
                return None;
            }
            TypedValue::Map {
                element_type,
                entries,
            } => {
                stack.push(Frame::table(entries, ElementTypes::Uniform(element_type)));
                return None;
            }
        };
        return Some(encoded);
    }
}

/// Whole numbers that fit in an i64 become integers; anything else stays a float.
fn classify_number(n: &Number) -> DocumentValue {
    if let Some(i) = n.as_i64() {
        return DocumentValue::Integer(i);
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    match whole_f64_as_i64(f) {
        Some(i) => DocumentValue::Integer(i),
        None => DocumentValue::Float(f),
    }
}

/// `f` as an i64 when it is a whole number in range.
pub(crate) fn whole_f64_as_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the exclusive upper bound.
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
}

fn first_duplicate(elements: &[TypedValue]) -> Option<usize> {
    (1..elements.len()).find(|&i| elements[..i].contains(&elements[i]))
}

/// Where a container's children get their declared types from.
#[derive(Clone, Copy)]
enum ElementTypes<'a> {
    Uniform(&'a TypeDescriptor),
    Positional(&'a [TypeDescriptor]),
    Named(&'a BTreeMap<String, TypeDescriptor>),
}

impl<'a> ElementTypes<'a> {
    fn at(self, index: usize) -> &'a TypeDescriptor {
        match self {
            ElementTypes::Uniform(ty) => ty,
            ElementTypes::Positional(types) => types.get(index).unwrap_or(&DYNAMIC),
            ElementTypes::Named(_) => &DYNAMIC,
        }
    }

    fn named(self, key: &str) -> &'a TypeDescriptor {
        match self {
            ElementTypes::Uniform(ty) => ty,
            ElementTypes::Named(types) => types.get(key).unwrap_or(&DYNAMIC),
            ElementTypes::Positional(_) => &DYNAMIC,
        }
    }
}

/// A container whose children are still being encoded.
enum Frame<'a> {
    Array {
        pending: slice::Iter<'a, TypedValue>,
        types: ElementTypes<'a>,
        visited: usize,
        items: Vec<DocumentValue>,
        failed: bool,
    },
    Table {
        pending: btree_map::Iter<'a, String, TypedValue>,
        types: ElementTypes<'a>,
        current: Option<&'a String>,
        entries: BTreeMap<String, DocumentValue>,
        failed: bool,
    },
}

impl<'a> Frame<'a> {
    fn array(elements: &'a [TypedValue], types: ElementTypes<'a>) -> Self {
        Frame::Array {
            pending: elements.iter(),
            types,
            visited: 0,
            items: Vec::with_capacity(elements.len()),
            failed: false,
        }
    }

    fn table(entries: &'a BTreeMap<String, TypedValue>, types: ElementTypes<'a>) -> Self {
        Frame::Table {
            pending: entries.iter(),
            types,
            current: None,
            entries: BTreeMap::new(),
            failed: false,
        }
    }

    fn next_child(&mut self) -> Option<(&'a TypedValue, &'a TypeDescriptor)> {
        match self {
            Frame::Array {
                pending,
                types,
                visited,
                ..
            } => {
                let value = pending.next()?;
                let declared = types.at(*visited);
                *visited += 1;
                Some((value, declared))
            }
            Frame::Table {
                pending,
                types,
                current,
                ..
            } => {
                let (key, value) = pending.next()?;
                *current = Some(key);
                Some((value, types.named(key)))
            }
        }
    }

    fn accept(&mut self, result: Encoded) {
        let key = match self {
            Frame::Table { current, .. } => current.take(),
            Frame::Array { .. } => None,
        };
        match result {
            Encoded::Failed => self.fail(),
            Encoded::Omitted => {}
            Encoded::Value(value) => match self {
                Frame::Array {
                    items,
                    failed: false,
                    ..
                } => items.push(value),
                Frame::Table {
                    entries,
                    failed: false,
                    ..
                } => {
                    if let Some(key) = key {
                        entries.insert(key.clone(), value);
                    }
                }
                _ => {}
            },
        }
    }

    fn fail(&mut self) {
        match self {
            Frame::Array { items, failed, .. } => {
                *failed = true;
                items.clear();
            }
            Frame::Table { entries, failed, .. } => {
                *failed = true;
                entries.clear();
            }
        }
    }

    fn finish(self) -> Encoded {
        match self {
            Frame::Array { failed: true, .. } | Frame::Table { failed: true, .. } => {
                Encoded::Failed
            }
            Frame::Array { items, .. } => Encoded::Value(DocumentValue::Array(items)),
            Frame::Table { entries, .. } => Encoded::Value(DocumentValue::Table(entries)),
        }
    }

    /// Path segment of the child currently being encoded.
    fn write_segment(&self, out: &mut String) {
        match self {
            Frame::Array { visited, .. } => {
                let _ = write!(out, "[{}]", visited.saturating_sub(1));
            }
            Frame::Table { current, .. } => {
                // Cleared once the child's result is accepted, so only a child
                // still in flight is named.
                if let Some(key) = current {
                    let _ = write!(out, ".{key}");
                }
            }
        }
    }
}

/// Dotted path from the root to the child the innermost frame is visiting.
fn current_path(stack: &[Frame<'_>]) -> String {
    if stack.is_empty() {
        return "the root".to_string();
    }
    let mut path = String::from("$");
    for frame in stack {
        frame.write_segment(&mut path);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(f: f64) -> Number {
        Number::from_f64(f).unwrap()
    }

    #[test]
    fn classify_whole_and_fractional_numbers() {
        assert_eq!(classify_number(&float(2.0)), DocumentValue::Integer(2));
        assert_eq!(classify_number(&float(-0.0)), DocumentValue::Integer(0));
        assert_eq!(classify_number(&float(2.1)), DocumentValue::Float(2.1));
        assert_eq!(classify_number(&float(1e300)), DocumentValue::Float(1e300));
    }

    #[test]
    fn classify_integers_exactly() {
        assert_eq!(
            classify_number(&Number::from(9_007_199_254_740_993i64)),
            DocumentValue::Integer(9_007_199_254_740_993)
        );
        assert_eq!(
            classify_number(&Number::from(i64::MAX)),
            DocumentValue::Integer(i64::MAX)
        );
        assert_eq!(
            classify_number(&Number::from(i64::MIN)),
            DocumentValue::Integer(i64::MIN)
        );
        assert_eq!(
            classify_number(&Number::from(u64::MAX)),
            DocumentValue::Float(u64::MAX as f64)
        );
    }

    #[test]
    fn first_duplicate_reports_later_index() {
        let elements = vec![
            TypedValue::from("a"),
            TypedValue::from("b"),
            TypedValue::from("a"),
        ];
        assert_eq!(first_duplicate(&elements), Some(2));
        assert_eq!(first_duplicate(&elements[..2]), None);
    }

    #[test]
    fn path_names_nested_child() {
        let list = vec![TypedValue::Int64(1), TypedValue::Int64(2)];
        let attributes = BTreeMap::from([("ports".to_string(), TypedValue::Null)]);
        let mut outer = Frame::table(&attributes, ElementTypes::Uniform(&DYNAMIC));
        outer.next_child();
        let mut inner = Frame::array(&list, ElementTypes::Uniform(&DYNAMIC));
        inner.next_child();
        inner.next_child();
        assert_eq!(current_path(&[outer, inner]), "$.ports[1]");
    }
}
