//! Network table: chain ids and address prefixes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A Binance Chain network
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Testnet];

    pub const fn chain_id(self) -> &'static str {
        match self {
            Network::Mainnet => "Binance-Chain-Tigris",
            Network::Testnet => "Binance-Chain-Nile",
        }
    }

    /// Bech32 human-readable prefix of account addresses
    pub const fn address_prefix(self) -> &'static str {
        match self {
            Network::Mainnet => "bnb",
            Network::Testnet => "tbnb",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Reverse lookup of [`Network::chain_id`]
    pub fn from_chain_id(chain_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| {
                crate::ValidationError::new("network", format!("unknown network {s:?}")).into()
            })
    }
}
