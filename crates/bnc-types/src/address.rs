//! Address types for bnc

use bech32::{Bech32, Hrp};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;
use crate::network::Network;

/// Account address - 20 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccAddress([u8; 20]);

impl AccAddress {
    /// Wrap raw address bytes
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create an address from a compressed public key using the standard
    /// derivation ripemd160(sha256(pubkey_bytes))
    pub fn from_pubkey(pubkey_bytes: &[u8]) -> Self {
        let sha256_hash = Sha256::digest(pubkey_bytes);
        let ripemd160_hash = Ripemd160::digest(sha256_hash);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&ripemd160_hash);
        Self(bytes)
    }

    /// Convert to Bech32 string with the given prefix
    pub fn to_bech32(&self, hrp_str: &str) -> Result<String, TypesError> {
        let hrp = Hrp::parse(hrp_str).map_err(|e| TypesError::invalid_address(hrp_str, e))?;
        bech32::encode::<Bech32>(hrp, &self.0).map_err(|e| TypesError::invalid_address(hrp_str, e))
    }

    /// Convert to the Bech32 form used on `network`
    pub fn to_network_string(&self, network: Network) -> Result<String, TypesError> {
        self.to_bech32(network.address_prefix())
    }

    /// Parse from Bech32 string, returning the human-readable prefix too
    pub fn from_bech32(s: &str) -> Result<(String, Self), TypesError> {
        let (hrp, data) = bech32::decode(s).map_err(|e| TypesError::invalid_address(s, e))?;
        let bytes: [u8; 20] = data.as_slice().try_into().map_err(|_| {
            TypesError::invalid_address(s, format!("expected 20 bytes, got {}", data.len()))
        })?;
        Ok((hrp.to_lowercase(), Self(bytes)))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Uppercase hex of the raw bytes, as used in order ids
    pub fn to_hex_upper(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .to_network_string(Network::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for AccAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, addr) = Self::from_bech32(s)?;
        Ok(addr)
    }
}
