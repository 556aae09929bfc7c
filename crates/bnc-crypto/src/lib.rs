//! Cryptographic primitives for bnc
//!
//! A secp256k1 [`KeyPair`] that signs the exact bytes it is handed, derives
//! the account address, and serializes its public key in the amino form a
//! signed transaction carries.

pub mod keys;

use thiserror::Error;

pub use keys::KeyPair;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("signing failed: {0}")]
    SigningFailure(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error(transparent)]
    Address(#[from] bnc_types::TypesError),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
