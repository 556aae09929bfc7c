//! Core types for bnc
//!
//! This crate provides the account address type, the network table, and the
//! ten transaction message kinds. Every message exists in two forms built
//! together: a wire form holding raw address bytes for the amino encoder,
//! and a sign form holding the original address strings for the sign
//! document.

pub mod address;
pub mod error;
pub mod msgs;
pub mod network;

pub use address::AccAddress;
pub use bnc_codec::TypeName;
pub use error::{TypesError, ValidationError};
pub use msgs::{AminoMsg, MsgPair, SignMsg, WireMsg};
pub use network::Network;
