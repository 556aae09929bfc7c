//! Coin and Coins types for handling tokens

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    #[error("invalid denomination: {0:?}")]
    InvalidDenom(String),

    #[error("negative amount not allowed")]
    NegativeAmount,

    #[error("sum of {0} amounts overflows")]
    Overflow(String),
}

/// A single coin with denomination and scaled amount
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: i64,
}

impl Coin {
    /// Create a new coin, validating denomination and amount
    pub fn new(denom: impl Into<String>, amount: i64) -> Result<Self, CoinError> {
        let denom = denom.into();
        if denom.is_empty() {
            return Err(CoinError::InvalidDenom(denom));
        }
        if amount < 0 {
            return Err(CoinError::NegativeAmount);
        }
        Ok(Self { denom, amount })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.amount, self.denom)
    }
}

/// A collection of coins, always sorted by denomination with one entry per denom
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Build a collection, summing coins that share a denomination
    pub fn new(coins: Vec<Coin>) -> Result<Self, CoinError> {
        let mut out = Self::empty();
        for coin in coins {
            out.add(coin)?;
        }
        Ok(out)
    }

    /// Create an empty Coins collection
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Coin> {
        self.0
    }

    /// Add a coin, merging it into an existing entry of the same denom
    pub fn add(&mut self, coin: Coin) -> Result<(), CoinError> {
        match self.0.binary_search_by(|c| c.denom.as_str().cmp(&coin.denom)) {
            Ok(pos) => {
                let existing = &mut self.0[pos];
                existing.amount = existing
                    .amount
                    .checked_add(coin.amount)
                    .ok_or_else(|| CoinError::Overflow(coin.denom.clone()))?;
            }
            Err(pos) => self.0.insert(pos, coin),
        }
        Ok(())
    }

    /// Add every coin of `other` into this collection
    pub fn merge(&mut self, other: &Coins) -> Result<(), CoinError> {
        for coin in other.iter() {
            self.add(coin.clone())?;
        }
        Ok(())
    }

    /// Find amount of a specific denomination
    pub fn amount_of(&self, denom: &str) -> i64 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", s.join(","))
    }
}
