//! Client library for building and signing Binance Chain transactions.
//!
//! The transaction pipeline is synchronous and does no I/O: a
//! [`TransactionBuilder`] turns a [`TxAction`] into a [`Transaction`], which
//! is either signed directly or serialized to an unsigned hex envelope for
//! signing elsewhere. Both paths meet in [`sign_transaction`]. The
//! [`api::ApiClient`] talks to the public HTTP API and is never called by the
//! pipeline itself.

pub mod api;
pub mod config;
pub mod envelope;
pub mod signer;
pub mod tx_builder;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError, OutputFormat};
pub use envelope::{parse_envelope, serialize_envelope};
pub use signer::{
    calculate_tx_hash, sign_transaction, SignSource, SignedTx, SigningConfig, StdSignature, StdTx,
    TxSigner,
};
pub use tx_builder::{SignDoc, TokenAction, Transaction, TransactionBuilder, TxAction};

use bnc_codec::CodecError;
use bnc_types::{TypesError, ValidationError};
use thiserror::Error;

/// Errors raised while building, serializing or signing a transaction
#[derive(Error, Debug)]
pub enum TxError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No sequence was supplied
    #[error("sequence is required")]
    MissingNonce,

    /// No account number, or account number zero, was supplied
    #[error("account number is required")]
    MissingAccountNumber,

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("unsupported message type: {0}")]
    UnsupportedMessageType(String),

    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("signing failed: {0}")]
    SigningFailure(String),

    /// The encoder rejected a value a message constructor produced
    #[error("encoding failed: {0}")]
    Codec(#[from] CodecError),
}

impl From<TypesError> for TxError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::InvalidAddress { address, reason } => {
                TxError::InvalidAddress { address, reason }
            }
            TypesError::Validation(e) => TxError::Validation(e),
            TypesError::UnsupportedMessageType(name) => TxError::UnsupportedMessageType(name),
            TypesError::MalformedMessage { msg_type, reason } => {
                TxError::MalformedEnvelope(format!("{msg_type} message: {reason}"))
            }
        }
    }
}

/// Errors raised by the HTTP API client
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("json parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with an error body
    #[error("api error {code}: {message}")]
    Api { code: i64, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for API client operations
pub type Result<T> = std::result::Result<T, ClientError>;
