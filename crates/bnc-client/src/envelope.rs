//! Unsigned transaction envelope
//!
//! An envelope is `hex(JSON{"msgType", "signStr"})`, where `signStr` is the
//! hex of the transaction's canonical sign document. It carries everything
//! needed to rebuild the [`Transaction`] on a machine that only holds the
//! key.

use bnc_codec::{CodecError, TypeName};
use bnc_types::{MsgPair, Network, SignMsg};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::tx_builder::{require_nonce, Transaction, SOURCE};
use crate::TxError;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    #[serde(rename = "msgType")]
    msg_type: &'a str,
    #[serde(rename = "signStr")]
    sign_str: String,
}

/// The sign document as read back from an envelope
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSignDoc {
    account_number: String,
    chain_id: String,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    memo: String,
    msgs: Vec<serde_json::Value>,
    sequence: String,
    source: String,
}

fn malformed(reason: impl Into<String>) -> TxError {
    TxError::MalformedEnvelope(reason.into())
}

/// Serialize an unsigned transaction to its hex envelope
pub fn serialize_envelope(tx: &Transaction) -> Result<String, TxError> {
    let sign_bytes = tx.sign_doc.sign_bytes()?;
    let envelope = EnvelopeOut {
        msg_type: tx.msg_type.as_str(),
        sign_str: hex::encode(sign_bytes),
    };
    let text = serde_json::to_vec(&envelope).map_err(CodecError::from)?;

    debug!(
        msg_type = %tx.msg_type,
        sequence = tx.sequence,
        envelope_len = text.len(),
        "serialized envelope"
    );
    Ok(hex::encode(text))
}

/// Rebuild a transaction from a hex envelope
///
/// The message is re-validated and its addresses re-decoded exactly as the
/// builder does, so a parsed transaction is indistinguishable from a freshly
/// built one. The rebuilt sign document must reproduce `signStr` byte for
/// byte.
pub fn parse_envelope(envelope: &str) -> Result<Transaction, TxError> {
    let text = hex::decode(envelope.trim())
        .map_err(|e| malformed(format!("envelope is not hex: {e}")))?;
    let outer: serde_json::Value = serde_json::from_slice(&text)
        .map_err(|e| malformed(format!("envelope is not json: {e}")))?;
    let outer = outer
        .as_object()
        .ok_or_else(|| malformed("envelope must be a json object"))?;

    if outer.contains_key("rawTransaction") {
        return Err(malformed("rawTransaction envelopes are not supported"));
    }
    let msg_type = outer
        .get("msgType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| malformed("missing msgType"))?;
    let sign_str = outer
        .get("signStr")
        .and_then(|v| v.as_str())
        .ok_or_else(|| malformed("missing signStr"))?;

    let type_name = TypeName::from_str(msg_type)
        .map_err(|_| TxError::UnsupportedMessageType(msg_type.to_string()))?;

    let doc_bytes =
        hex::decode(sign_str).map_err(|e| malformed(format!("signStr is not hex: {e}")))?;
    let doc: RawSignDoc = serde_json::from_slice(&doc_bytes)
        .map_err(|e| malformed(format!("invalid sign document: {e}")))?;
    if !doc.data.is_null() {
        return Err(malformed(format!("data must be null, got {}", doc.data)));
    }
    if doc.source != SOURCE.to_string() {
        return Err(malformed(format!("unexpected source {:?}", doc.source)));
    }

    let network = Network::from_chain_id(&doc.chain_id)
        .ok_or_else(|| malformed(format!("unknown chain id {:?}", doc.chain_id)))?;
    let account_number = parse_counter("account_number", &doc.account_number)?;
    let sequence = parse_counter("sequence", &doc.sequence)?;
    let (account_number, sequence) = require_nonce(Some(account_number), Some(sequence))?;

    let [msg]: [serde_json::Value; 1] = doc.msgs.try_into().map_err(|msgs: Vec<_>| {
        malformed(format!("expected exactly one message, got {}", msgs.len()))
    })?;
    let pair = MsgPair::from_sign(SignMsg::from_json(type_name, msg)?)?;

    let tx = Transaction::prepare(network, account_number, sequence, &doc.memo, pair);
    if tx.sign_doc.sign_bytes()? != doc_bytes {
        return Err(malformed("signStr is not the canonical sign document"));
    }

    debug!(msg_type = %type_name, %network, sequence, "parsed envelope");
    Ok(tx)
}

fn parse_counter(field: &str, value: &str) -> Result<u64, TxError> {
    value
        .parse()
        .map_err(|_| malformed(format!("{field} {value:?} is not an unsigned integer")))
}
