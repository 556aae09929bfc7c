//! Encoding utilities for Binance Chain transactions.
//!
//! This crate provides the two serializations a transaction goes through:
//! the schema-less amino binary encoding used on the wire, and the
//! canonical JSON text that is signed.

pub mod amino;
pub mod canonical;
pub mod registry;
pub mod varint;

use thiserror::Error;

pub use amino::{encode_value, marshal, marshal_bare, Field, Object, Value};
pub use canonical::{canonical_json, sort_keys};
pub use registry::{TypeName, UnknownTypeName};

/// Codec error types
#[derive(Error, Debug)]
pub enum CodecError {
    /// A primitive encoder was handed a value outside its domain
    #[error("invalid encoding input: {0}")]
    InvalidEncodingInput(String),

    /// The value kind has no amino representation
    #[error("unsupported value kind: {0}")]
    UnsupportedValueKind(String),

    /// A top-level entry point was handed something other than an object
    #[error("type error: {0}")]
    TypeError(String),

    /// JSON serialization of a sign document failed
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
