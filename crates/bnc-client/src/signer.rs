//! Transaction signing
//!
//! Signing has two entry points, an in-memory [`Transaction`] and a hex
//! envelope, and one procedure: the envelope is parsed into a transaction,
//! then both are signed by [`sign_transaction`] from a freshly derived
//! sign document.

use bnc_codec::{Object, TypeName, Value};
use bnc_crypto::KeyPair;
use bnc_types::WireMsg;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::envelope::parse_envelope;
use crate::tx_builder::{Transaction, SOURCE};
use crate::TxError;

/// Something that can sign sign-document bytes for one account
pub trait TxSigner {
    /// Amino-serialized public key, as carried in a signature entry
    fn serialized_public_key(&self) -> Vec<u8>;

    /// Sign `message`, returning a 64-byte compact signature
    fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, TxError>;

    fn verify_message(&self, signature: &[u8], message: &[u8]) -> bool;
}

impl TxSigner for KeyPair {
    fn serialized_public_key(&self) -> Vec<u8> {
        self.serialize_public_key()
    }

    fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, TxError> {
        self.sign(message)
            .map_err(|e| TxError::SigningFailure(e.to_string()))
    }

    fn verify_message(&self, signature: &[u8], message: &[u8]) -> bool {
        self.verify(signature, message)
    }
}

/// What to sign
#[derive(Clone, Copy, Debug)]
pub enum SignSource<'a> {
    Transaction(&'a Transaction),
    /// A hex envelope produced by [`crate::serialize_envelope`]
    Envelope(&'a str),
}

/// Transaction signing configuration
#[derive(Debug, Clone)]
pub struct SigningConfig {
    /// Whether to verify the signature before assembling the transaction
    pub verify_signature: bool,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            verify_signature: true,
        }
    }
}

/// One signature entry of a [`StdTx`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StdSignature {
    pub pub_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub account_number: u64,
    pub sequence: u64,
}

impl StdSignature {
    fn to_object(&self) -> Object {
        Object::anonymous()
            .field("pub_key", self.pub_key.clone())
            .field("signature", self.signature.clone())
            .field("account_number", self.account_number)
            .field("sequence", self.sequence)
    }
}

/// A signed, broadcast-ready transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StdTx {
    pub msgs: Vec<WireMsg>,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
    pub source: i64,
    pub data: String,
}

impl StdTx {
    /// Combine `tx` with a single signature
    pub fn new(tx: &Transaction, signature: StdSignature) -> Self {
        Self {
            msgs: tx.msgs().to_vec(),
            signatures: vec![signature],
            memo: tx.memo.clone(),
            source: SOURCE,
            data: String::new(),
        }
    }

    pub fn to_object(&self) -> Object {
        let msgs = self.msgs.iter().map(WireMsg::to_value).collect::<Vec<_>>();
        let signatures = self
            .signatures
            .iter()
            .map(|s| Value::Object(s.to_object()))
            .collect::<Vec<_>>();
        Object::typed(TypeName::StdTx)
            .field("msg", msgs)
            .field("signatures", signatures)
            .field("memo", self.memo.as_str())
            .field("source", self.source)
            .field("data", self.data.as_str())
    }

    /// Length-prefixed amino encoding
    pub fn marshal(&self) -> bnc_codec::Result<Vec<u8>> {
        bnc_codec::marshal(&Value::Object(self.to_object()))
    }
}

/// Transaction signing result
#[derive(Debug, Clone)]
pub struct SignedTx {
    pub std_tx: StdTx,
    /// Encoded transaction bytes
    pub tx_bytes: Vec<u8>,
    /// Lowercase hex of `tx_bytes`, as accepted by the broadcast endpoint
    pub hex: String,
    /// Uppercase hex sha256 of `tx_bytes`
    pub tx_hash: String,
}

/// Sign a transaction or an envelope
pub fn sign_transaction<S: TxSigner + ?Sized>(
    signer: &S,
    source: SignSource<'_>,
    config: &SigningConfig,
) -> Result<SignedTx, TxError> {
    match source {
        SignSource::Transaction(tx) => sign_prepared(signer, tx, config),
        SignSource::Envelope(envelope) => {
            let tx = parse_envelope(envelope)?;
            sign_prepared(signer, &tx, config)
        }
    }
}

fn sign_prepared<S: TxSigner + ?Sized>(
    signer: &S,
    tx: &Transaction,
    config: &SigningConfig,
) -> Result<SignedTx, TxError> {
    let sign_bytes = tx.sign_doc.sign_bytes()?;
    let signature = signer.sign_message(&sign_bytes)?;

    if config.verify_signature && !signer.verify_message(&signature, &sign_bytes) {
        return Err(TxError::SigningFailure(
            "signature does not verify against the sign document".to_string(),
        ));
    }

    let std_tx = StdTx::new(
        tx,
        StdSignature {
            pub_key: signer.serialized_public_key(),
            signature,
            account_number: tx.account_number,
            sequence: tx.sequence,
        },
    );
    let tx_bytes = std_tx.marshal()?;
    let tx_hash = calculate_tx_hash(&tx_bytes);

    debug!(
        msg_type = %tx.msg_type,
        sequence = tx.sequence,
        tx_len = tx_bytes.len(),
        %tx_hash,
        "signed transaction"
    );

    Ok(SignedTx {
        std_tx,
        hex: hex::encode(&tx_bytes),
        tx_bytes,
        tx_hash,
    })
}

/// Calculate the transaction hash the chain reports for `tx_bytes`
pub fn calculate_tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::serialize_envelope;
    use crate::tx_builder::{TokenAction, TransactionBuilder, TxAction};
    use bnc_types::Network;

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";
    const ADDR_A: &str = "tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8";

    /// Signs correctly but reports every signature as invalid
    struct RejectingSigner(KeyPair);

    impl TxSigner for RejectingSigner {
        fn serialized_public_key(&self) -> Vec<u8> {
            self.0.serialize_public_key()
        }

        fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, TxError> {
            self.0.sign_message(message)
        }

        fn verify_message(&self, _signature: &[u8], _message: &[u8]) -> bool {
            false
        }
    }

    fn burn_tx() -> Transaction {
        TransactionBuilder::new(Network::Testnet)
            .account_number(34)
            .sequence(31)
            .create(&TxAction::Burn(TokenAction {
                from: ADDR_A.to_string(),
                symbol: "XYZ-D06".to_string(),
                amount: "1".to_string(),
            }))
            .unwrap()
    }

    #[test]
    fn test_sign_with_key_pair() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        let tx = burn_tx();
        let signed =
            sign_transaction(&key, SignSource::Transaction(&tx), &SigningConfig::default())
                .unwrap();

        assert_eq!(signed.hex, hex::encode(&signed.tx_bytes));
        assert_eq!(signed.tx_hash.len(), 64);
        assert_eq!(signed.tx_hash, signed.tx_hash.to_uppercase());
        assert_eq!(signed.std_tx.signatures.len(), 1);

        let sig = &signed.std_tx.signatures[0];
        assert_eq!(sig.account_number, 34);
        assert_eq!(sig.sequence, 31);
        let sign_bytes = tx.sign_doc.sign_bytes().unwrap();
        assert!(key.verify(&sig.signature, &sign_bytes));
    }

    #[test]
    fn test_envelope_and_transaction_paths_agree() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        let tx = burn_tx();
        let envelope = serialize_envelope(&tx).unwrap();
        let config = SigningConfig::default();

        let direct = sign_transaction(&key, SignSource::Transaction(&tx), &config).unwrap();
        let offline = sign_transaction(&key, SignSource::Envelope(&envelope), &config).unwrap();
        assert_eq!(direct.tx_bytes, offline.tx_bytes);
        assert_eq!(direct.tx_hash, offline.tx_hash);
    }

    #[test]
    fn test_failed_verification_is_a_signing_failure() {
        let signer = RejectingSigner(KeyPair::from_hex(KEY_ONE).unwrap());
        let tx = burn_tx();

        let result = sign_transaction(
            &signer,
            SignSource::Transaction(&tx),
            &SigningConfig::default(),
        );
        assert!(matches!(result, Err(TxError::SigningFailure(_))));

        let unchecked = SigningConfig {
            verify_signature: false,
        };
        assert!(sign_transaction(&signer, SignSource::Transaction(&tx), &unchecked).is_ok());
    }

    #[test]
    fn test_malformed_envelope_is_not_signed() {
        let key = KeyPair::from_hex(KEY_ONE).unwrap();
        let result = sign_transaction(
            &key,
            SignSource::Envelope("not hex"),
            &SigningConfig::default(),
        );
        assert!(matches!(result, Err(TxError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_tx_hash() {
        assert_eq!(
            calculate_tx_hash(b""),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }
}
