//! Error types for document-level decode, encode and identity operations.

use crate::diagnostics::Diagnostics;
use thiserror::Error;

/// Errors that can occur while moving values between TOML text and typed values.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The input text was not valid TOML. Carries the parser's message.
    #[error("The TOML content cannot be decoded.\n\nOriginal Error: {0}")]
    Parse(String),

    /// One or more document values could not be converted to typed values.
    #[error("The TOML content cannot be converted to a typed value.\n\n{0}")]
    Conversion(Diagnostics),

    /// One or more typed values could not be converted to document values.
    #[error("The value cannot be encoded to TOML.\n\n{0}")]
    Encode(Diagnostics),

    /// The TOML renderer rejected a document value.
    #[error("The value cannot be rendered as TOML.\n\nOriginal Error: {0}")]
    Render(String),

    /// A document value has no canonical JSON form (non-finite float, invalid datetime).
    #[error("The loaded content could not be encoded as JSON.\n\nOriginal Error: {0}")]
    Interchange(String),

    /// serde_json failed while writing interchange output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    /// Diagnostics carried by this error, if it came out of a tree conversion.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            BridgeError::Conversion(diags) | BridgeError::Encode(diags) => Some(diags),
            _ => None,
        }
    }
}

/// Convenience alias used throughout tomlbridge-core.
pub type Result<T> = std::result::Result<T, BridgeError>;
