//! secp256k1 key pair

use bnc_codec::varint::encode_length_prefixed_bytes;
use bnc_codec::TypeName;
use bnc_types::{AccAddress, Network};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use signature::{Signer, Verifier};
use std::fmt;

use crate::{CryptoError, Result};

/// Length of a compact r||s signature
pub const SIGNATURE_LEN: usize = 64;

/// A secp256k1 signing key and its public half
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Load a key from 32 hex-encoded bytes
    pub fn from_hex(private_key_hex: &str) -> Result<Self> {
        let bytes = hex::decode(private_key_hex.trim().trim_start_matches("0x"))
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// 33-byte compressed public key: parity tag then X coordinate
    pub fn public_key_compressed(&self) -> Vec<u8> {
        self.verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    pub fn address(&self) -> AccAddress {
        AccAddress::from_pubkey(&self.public_key_compressed())
    }

    pub fn address_string(&self, network: Network) -> Result<String> {
        Ok(self.address().to_network_string(network)?)
    }

    /// Amino form of the public key: type prefix, length, compressed point
    pub fn serialize_public_key(&self) -> Vec<u8> {
        let mut out = TypeName::PubKeySecp256k1.prefix().to_vec();
        out.extend(encode_length_prefixed_bytes(&self.public_key_compressed()));
        out
    }

    /// Sign sha256(`message`) deterministically, returning the 64-byte
    /// low-S r||s signature
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let sig: Signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))?;
        Ok(sig.to_bytes().to_vec())
    }

    /// Verify a signature produced by [`KeyPair::sign`] against this key
    pub fn verify(&self, signature: &[u8], message: &[u8]) -> bool {
        verify(signature, message, &self.public_key_compressed()).is_ok()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key_compressed()))
            .finish_non_exhaustive()
    }
}

/// Verify a 64-byte signature over `message` with a SEC1-encoded public key
pub fn verify(signature: &[u8], message: &[u8], public_key: &[u8]) -> Result<()> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::InvalidSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }
    let key = VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    let sig = Signature::from_slice(signature)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    key.verify(message, &sig)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
}

/// True when `address` decodes and carries the prefix of `network`
pub fn check_address(address: &str, network: Network) -> bool {
    match AccAddress::from_bech32(address) {
        Ok((hrp, _)) => hrp == network.address_prefix(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_public_key_and_address() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        assert_eq!(
            hex::encode(key.public_key_compressed()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
        assert_eq!(
            key.address_string(Network::Testnet).unwrap(),
            "tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8"
        );
        assert_eq!(
            key.address_string(Network::Mainnet).unwrap(),
            "bnb1w508d6qejxtdg4y5r3zarvary0c5xw7kcegkwk"
        );
    }

    #[test]
    fn test_serialize_public_key() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        assert_eq!(
            hex::encode(key.serialize_public_key()),
            "eb5ae987210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_sign_and_verify() {
        let key = KeyPair::generate();
        let message = br#"{"account_number":"1"}"#;

        let sig = key.sign(message).unwrap();
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(key.verify(&sig, message));
        assert!(!key.verify(&sig, b"tampered"));

        let other = KeyPair::generate();
        assert!(!other.verify(&sig, message));
    }

    #[test]
    fn test_signature_is_deterministic_and_low_s() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        let a = key.sign(b"message").unwrap();
        let b = key.sign(b"message").unwrap();
        assert_eq!(a, b);

        let sig = Signature::from_slice(&a).unwrap();
        assert!(sig.normalize_s().is_none());
    }

    #[test]
    fn test_signs_sha256_of_message() {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;

        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        let sig = Signature::from_slice(&key.sign(b"payload").unwrap()).unwrap();
        let digest = Sha256::digest(b"payload");
        assert!(key.verifying_key().verify_prehash(&digest, &sig).is_ok());
    }

    #[test]
    fn test_invalid_private_keys() {
        assert!(matches!(
            KeyPair::from_hex("zz"),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            KeyPair::from_hex("01"),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            KeyPair::from_hex(&"00".repeat(32)),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
        assert!(KeyPair::from_hex(&format!("0x{KEY_ONE}")).is_ok());
    }

    #[test]
    fn test_verify_rejects_bad_lengths() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        assert!(matches!(
            verify(&[0u8; 10], b"m", &key.public_key_compressed()),
            Err(CryptoError::InvalidSignature(_))
        ));
        assert!(!key.verify(&[0u8; 64], b"m"));
    }

    #[test]
    fn test_check_address() {
        assert!(check_address(
            "tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8",
            Network::Testnet
        ));
        assert!(!check_address(
            "tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8",
            Network::Mainnet
        ));
        assert!(!check_address("bnb1invalid", Network::Mainnet));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains(KEY_ONE));
        assert!(debug.contains("0279be66"));
    }
}
