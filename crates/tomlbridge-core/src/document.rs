//! Document model: the untyped value tree on the TOML side of the bridge.
//!
//! The `toml` crate does the actual parsing and rendering. This module only
//! moves values between its `toml::Value` tree and [`DocumentValue`], which
//! adds an explicit `Null` and splits the single TOML datetime type into the
//! four kinds the TOML grammar distinguishes.

use crate::error::{BridgeError, Result};
use crate::temporal::TemporalKind;
use std::collections::BTreeMap;
use toml::value::Datetime;

/// A value produced by parsing a TOML document.
///
/// Tables are keyed in byte order; the source order of keys carries no meaning.
/// Arrays keep exactly the order the parser produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// A date-time with a UTC offset, e.g. `1979-05-27T07:32:00Z`.
    OffsetDateTime(Datetime),
    /// A date-time without an offset, e.g. `1979-05-27T07:32:00`.
    LocalDateTime(Datetime),
    /// A calendar date, e.g. `1979-05-27`.
    LocalDate(Datetime),
    /// A wall-clock time, e.g. `07:32:00`.
    LocalTime(Datetime),
    Array(Vec<DocumentValue>),
    Table(BTreeMap<String, DocumentValue>),
}

impl DocumentValue {
    /// Wrap a TOML datetime in the variant matching the components it carries.
    pub fn from_datetime(datetime: Datetime) -> Self {
        match TemporalKind::classify(&datetime) {
            TemporalKind::OffsetDateTime => DocumentValue::OffsetDateTime(datetime),
            TemporalKind::LocalDateTime => DocumentValue::LocalDateTime(datetime),
            TemporalKind::LocalDate => DocumentValue::LocalDate(datetime),
            TemporalKind::LocalTime => DocumentValue::LocalTime(datetime),
        }
    }

    /// The temporal kind and raw datetime, if this is one of the four temporal variants.
    pub fn as_temporal(&self) -> Option<(TemporalKind, &Datetime)> {
        match self {
            DocumentValue::OffsetDateTime(dt) => Some((TemporalKind::OffsetDateTime, dt)),
            DocumentValue::LocalDateTime(dt) => Some((TemporalKind::LocalDateTime, dt)),
            DocumentValue::LocalDate(dt) => Some((TemporalKind::LocalDate, dt)),
            DocumentValue::LocalTime(dt) => Some((TemporalKind::LocalTime, dt)),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&BTreeMap<String, DocumentValue>> {
        match self {
            DocumentValue::Table(entries) => Some(entries),
            _ => None,
        }
    }

    /// Human-readable name of the runtime shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentValue::Null => "null",
            DocumentValue::String(_) => "string",
            DocumentValue::Integer(_) => "integer",
            DocumentValue::Float(_) => "float",
            DocumentValue::Boolean(_) => "boolean",
            DocumentValue::OffsetDateTime(_) => TemporalKind::OffsetDateTime.name(),
            DocumentValue::LocalDateTime(_) => TemporalKind::LocalDateTime.name(),
            DocumentValue::LocalDate(_) => TemporalKind::LocalDate.name(),
            DocumentValue::LocalTime(_) => TemporalKind::LocalTime.name(),
            DocumentValue::Array(_) => "array",
            DocumentValue::Table(_) => "table",
        }
    }
}

impl From<toml::Value> for DocumentValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => DocumentValue::String(s),
            toml::Value::Integer(i) => DocumentValue::Integer(i),
            toml::Value::Float(f) => DocumentValue::Float(f),
            toml::Value::Boolean(b) => DocumentValue::Boolean(b),
            toml::Value::Datetime(dt) => DocumentValue::from_datetime(dt),
            toml::Value::Array(items) => {
                DocumentValue::Array(items.into_iter().map(DocumentValue::from).collect())
            }
            toml::Value::Table(table) => DocumentValue::from(table),
        }
    }
}

impl From<toml::Table> for DocumentValue {
    fn from(table: toml::Table) -> Self {
        DocumentValue::Table(
            table
                .into_iter()
                .map(|(key, value)| (key, DocumentValue::from(value)))
                .collect(),
        )
    }
}

/// Parse TOML text into a document tree. The root is always a table.
///
/// Parser failures are returned as [`BridgeError::Parse`] carrying the
/// parser's own message; no conversion is attempted.
pub fn parse(text: &str) -> Result<DocumentValue> {
    let table: toml::Table =
        toml::from_str(text).map_err(|e| BridgeError::Parse(e.to_string()))?;
    let value = DocumentValue::from(table);
    tracing::debug!(
        keys = value.as_table().map_or(0, BTreeMap::len),
        "parsed TOML document"
    );
    Ok(value)
}

/// Render a document tree as TOML text.
///
/// A root `Null` renders the empty document. Any other non-table root, and
/// any `Null` nested below the root, is rejected with [`BridgeError::Render`]
/// since TOML has no way to spell them.
pub fn render(value: &DocumentValue) -> Result<String> {
    match value {
        DocumentValue::Null => Ok(String::new()),
        DocumentValue::Table(entries) => {
            let table = to_toml_table(entries)?;
            toml::to_string(&table).map_err(|e| BridgeError::Render(e.to_string()))
        }
        other => Err(BridgeError::Render(format!(
            "a TOML document must be a table at the top level, found {}",
            other.kind()
        ))),
    }
}

fn to_toml_table(entries: &BTreeMap<String, DocumentValue>) -> Result<toml::Table> {
    let mut table = toml::Table::new();
    for (key, value) in entries {
        let value = to_toml(value).map_err(|e| match e {
            BridgeError::Render(message) => BridgeError::Render(format!("{key}: {message}")),
            other => other,
        })?;
        table.insert(key.clone(), value);
    }
    Ok(table)
}

fn to_toml(value: &DocumentValue) -> Result<toml::Value> {
    Ok(match value {
        DocumentValue::Null => {
            return Err(BridgeError::Render(
                "null values have no TOML representation".to_string(),
            ))
        }
        DocumentValue::String(s) => toml::Value::String(s.clone()),
        DocumentValue::Integer(i) => toml::Value::Integer(*i),
        DocumentValue::Float(f) => toml::Value::Float(*f),
        DocumentValue::Boolean(b) => toml::Value::Boolean(*b),
        DocumentValue::OffsetDateTime(dt)
        | DocumentValue::LocalDateTime(dt)
        | DocumentValue::LocalDate(dt)
        | DocumentValue::LocalTime(dt) => toml::Value::Datetime(*dt),
        DocumentValue::Array(items) => {
            toml::Value::Array(items.iter().map(to_toml).collect::<Result<Vec<_>>>()?)
        }
        DocumentValue::Table(entries) => toml::Value::Table(to_toml_table(entries)?),
    })
}
