//! # tomlbridge-core
//!
//! Total, diagnostic-collecting conversion between TOML documents and a host
//! runtime's typed values, plus a deterministic content identity for change
//! detection.
//!
//! ## Quick start
//!
//! ```rust
//! use tomlbridge_core::{decode_document, encode_document, TomlFile, TypedValue};
//!
//! // TOML → typed value
//! let value = decode_document("section.field1 = \"value1\"").unwrap();
//! assert_eq!(
//!     value,
//!     TypedValue::object([(
//!         "section",
//!         TypedValue::object([("field1", TypedValue::from("value1"))]),
//!     )])
//! );
//!
//! // typed value → TOML (null attributes are left out)
//! let toml = encode_document(&TypedValue::object([
//!     ("b", TypedValue::Number(1.into())),
//!     ("c", TypedValue::Null),
//! ]))
//! .unwrap();
//! assert_eq!(toml, "b = 1\n");
//!
//! // content plus fingerprint
//! let file = TomlFile::read("name = \"x\"").unwrap();
//! assert_eq!(file.content_json, r#"{"name":"x"}"#);
//! assert_eq!(file.id.len(), 40);
//! ```
//!
//! ## Modules
//!
//! - [`document`]: `DocumentValue` tree; TOML parse/render seam over the `toml` crate
//! - [`typed`]: `TypedValue` tree and `TypeDescriptor`
//! - [`decode`](mod@decode): document tree → typed value
//! - [`encode`](mod@encode): typed value → document tree
//! - [`identity`]: canonical JSON and SHA-1 content identity
//! - [`diagnostics`]: severity-tagged records shared by both converters
//! - [`temporal`]: the four TOML datetime kinds and their string renderings
//! - [`json`]: generic JSON view of typed values
//! - [`bridge`]: document-level decode/encode and the `TomlFile` data source
//! - [`error`]: error types

pub mod bridge;
pub mod decode;
pub mod diagnostics;
pub mod document;
pub mod encode;
pub mod error;
pub mod identity;
pub mod json;
pub mod temporal;
pub mod typed;

pub use bridge::{decode_document, encode_document, TomlFile};
pub use decode::decode;
pub use diagnostics::{Converted, Diagnostic, Diagnostics, Direction, Severity};
pub use document::DocumentValue;
pub use encode::encode;
pub use error::{BridgeError, Result};
pub use identity::{canonical_json, identity, Fingerprint};
pub use temporal::TemporalKind;
pub use typed::{TypeDescriptor, TypedValue};
