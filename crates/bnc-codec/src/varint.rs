//! Unsigned LEB128 varints and length-prefixed byte strings

use crate::{CodecError, Result};

/// Encode `n` as a minimal-length unsigned LEB128 varint
pub fn encode_uvarint(mut n: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(10);
    while n >= 0x80 {
        buf.push((n as u8 & 0x7f) | 0x80);
        n >>= 7;
    }
    buf.push(n as u8);
    buf
}

/// Encode a signed integer as an unsigned varint, rejecting negative input
pub fn encode_uvarint_checked(n: i64) -> Result<Vec<u8>> {
    let n = u64::try_from(n).map_err(|_| {
        CodecError::InvalidEncodingInput(format!("cannot varint-encode negative number {n}"))
    })?;
    Ok(encode_uvarint(n))
}

/// Prefix `bytes` with its varint length
pub fn encode_length_prefixed_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut buf = encode_uvarint(bytes.len() as u64);
    buf.extend_from_slice(bytes);
    buf
}

/// Prefix the UTF-8 bytes of `s` with their varint length
pub fn encode_length_prefixed_string(s: &str) -> Vec<u8> {
    encode_length_prefixed_bytes(s.as_bytes())
}
