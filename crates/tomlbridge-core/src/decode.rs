//! Decode converter: document tree → typed value tree.
//!
//! | TOML type          | Typed value                                        |
//! |--------------------|----------------------------------------------------|
//! | `String`           | `String`                                           |
//! | `Integer`          | `Int64`                                            |
//! | `Float`            | `Float64`                                          |
//! | `Boolean`          | `Bool`                                             |
//! | `Offset Date-Time` | `String`, RFC 3339                                 |
//! | `Local Date-Time`  | `String`, RFC 3339 without offset                  |
//! | `Local Date`       | `String`, `YYYY-MM-DD`                             |
//! | `Local Time`       | `String`, `HH:MM:SS[.fraction]`                    |
//! | `Table`            | `Object`, attribute types per this table           |
//! | `Array`            | `Tuple`, element types per this table              |
//!
//! The walk uses an explicit stack of partially built containers instead of
//! recursion, so nesting depth is limited by heap, not by the call stack.
//! Every element is visited even after a sibling fails; a container with a
//! failed descendant produces no value, and each offending leaf contributes
//! exactly one diagnostic.

use crate::diagnostics::{Converted, Diagnostics};
use crate::document::DocumentValue;
use crate::typed::TypedValue;
use std::collections::{btree_map, BTreeMap};
use std::slice;

const INVALID_VALUE_SUMMARY: &str = "Invalid value to convert to typed value";

/// Convert a document tree into a typed value, collecting every diagnostic.
///
/// The input is never modified; the output tree is freshly allocated.
pub fn decode(value: &DocumentValue) -> Converted<TypedValue> {
    let mut diagnostics = Diagnostics::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut next = Some(value);

    loop {
        // Descend: scalars finish immediately, containers push a frame.
        let mut finished = next.take().and_then(|value| match value {
            DocumentValue::Array(items) => {
                stack.push(Frame::tuple(items));
                None
            }
            DocumentValue::Table(entries) => {
                stack.push(Frame::object(entries));
                None
            }
            scalar => Some(decode_scalar(scalar, &mut diagnostics)),
        });

        // Ascend: hand finished values to their parents until some frame has
        // another child to visit.
        loop {
            let Some(frame) = stack.last_mut() else {
                let value = finished.flatten();
                tracing::debug!(
                    errors = diagnostics.error_count(),
                    ok = value.is_some(),
                    "decoded document value"
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

fn decode_scalar(value: &DocumentValue, diagnostics: &mut Diagnostics) -> Option<TypedValue> {
    match value {
        DocumentValue::Null => Some(TypedValue::Null),
        DocumentValue::String(s) => Some(TypedValue::String(s.clone())),
        DocumentValue::Integer(i) => Some(TypedValue::Int64(*i)),
        DocumentValue::Float(f) => Some(TypedValue::Float64(*f)),
        DocumentValue::Boolean(b) => Some(TypedValue::Bool(*b)),
        DocumentValue::OffsetDateTime(dt)
        | DocumentValue::LocalDateTime(dt)
        | DocumentValue::LocalDate(dt)
        | DocumentValue::LocalTime(dt) => {
            let rendered = value
                .as_temporal()
                .and_then(|(kind, datetime)| kind.render(datetime));
            if rendered.is_none() {
                diagnostics.add_error(
                    INVALID_VALUE_SUMMARY,
                    format!(
                        "Unable to convert value {dt} (type {}) to typed value",
                        value.kind()
                    ),
                );
            }
            rendered.map(TypedValue::String)
        }
        DocumentValue::Array(_) | DocumentValue::Table(_) => {
            diagnostics.add_error(
                INVALID_VALUE_SUMMARY,
                format!(
                    "unsupported value encountered during decode: {} reached the scalar path",
                    value.kind()
                ),
            );
            None
        }
    }
}

/// A container whose children are still being decoded.
enum Frame<'a> {
    Tuple {
        pending: slice::Iter<'a, DocumentValue>,
        elements: Vec<TypedValue>,
        failed: bool,
    },
    Object {
        pending: btree_map::Iter<'a, String, DocumentValue>,
        current: Option<&'a String>,
        attributes: BTreeMap<String, TypedValue>,
        failed: bool,
    },
}

impl<'a> Frame<'a> {
    fn tuple(items: &'a [DocumentValue]) -> Self {
        Frame::Tuple {
            pending: items.iter(),
            elements: Vec::with_capacity(items.len()),
            failed: false,
        }
    }

    fn object(entries: &'a BTreeMap<String, DocumentValue>) -> Self {
        Frame::Object {
            pending: entries.iter(),
            current: None,
            attributes: BTreeMap::new(),
            failed: false,
        }
    }

    fn next_child(&mut self) -> Option<&'a DocumentValue> {
        match self {
            Frame::Tuple { pending, .. } => pending.next(),
            Frame::Object {
                pending, current, ..
            } => {
                let (key, value) = pending.next()?;
                *current = Some(key);
                Some(value)
            }
        }
    }

    /// Record the outcome of the child most recently returned by `next_child`.
    fn accept(&mut self, result: Option<TypedValue>) {
        match self {
            Frame::Tuple {
                elements, failed, ..
            } => match result {
                Some(value) if !*failed => elements.push(value),
                Some(_) => {}
                None => {
                    *failed = true;
                    elements.clear();
                }
            },
            Frame::Object {
                current,
                attributes,
                failed,
                ..
            } => match (result, current.take()) {
                (Some(value), Some(key)) if !*failed => {
                    attributes.insert(key.clone(), value);
                }
                (Some(_), _) => {}
                (None, _) => {
                    *failed = true;
                    attributes.clear();
                }
            },
        }
    }

    fn finish(self) -> Option<TypedValue> {
        match self {
            Frame::Tuple {
                elements, failed, ..
            } => (!failed).then_some(TypedValue::Tuple(elements)),
            Frame::Object {
                attributes, failed, ..
            } => (!failed).then_some(TypedValue::Object(attributes)),
        }
    }
}
