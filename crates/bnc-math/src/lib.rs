//! Mathematical types for bnc
//!
//! Token amounts on the chain are integers with eight implied decimals.
//! This crate converts human-readable decimal strings into that
//! representation without ever touching floating point, and provides the
//! coin collections transactions are built from.

pub mod amount;
pub mod coin;

pub use amount::{scale_amount, scale_positive_amount, unscale_amount, AmountError, DECIMALS, MAX_SUPPLY};
pub use coin::{Coin, CoinError, Coins};
