//! Error handling for bnc-types

use thiserror::Error;

/// A caller-supplied argument failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unsupported message type: {0}")]
    UnsupportedMessageType(String),

    /// A sign-form message could not be read back from JSON
    #[error("malformed {msg_type} message: {reason}")]
    MalformedMessage { msg_type: String, reason: String },
}

impl TypesError {
    pub(crate) fn invalid_address(address: &str, reason: impl ToString) -> Self {
        TypesError::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}
