//! Amino type names and their registered 4-byte prefixes
//!
//! Amino carries no schema on the wire. A decoder recognises a concrete
//! type only by the prefix that precedes its fields, so this table is part
//! of the wire format and must never change.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every type name known to the chain's amino codec
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    MsgSend,
    NewOrderMsg,
    CancelOrderMsg,
    IssueMsg,
    BurnMsg,
    FreezeMsg,
    UnfreezeMsg,
    MintMsg,
    ListMsg,
    StdTx,
    PubKeySecp256k1,
    SignatureSecp256k1,
    MsgSubmitProposal,
    MsgDeposit,
    MsgVote,
}

/// Returned when parsing a string that is not a registered type name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown amino type name: {0}")]
pub struct UnknownTypeName(pub String);

impl TypeName {
    /// All registered names, in registration order
    pub const ALL: [TypeName; 15] = [
        TypeName::MsgSend,
        TypeName::NewOrderMsg,
        TypeName::CancelOrderMsg,
        TypeName::IssueMsg,
        TypeName::BurnMsg,
        TypeName::FreezeMsg,
        TypeName::UnfreezeMsg,
        TypeName::MintMsg,
        TypeName::ListMsg,
        TypeName::StdTx,
        TypeName::PubKeySecp256k1,
        TypeName::SignatureSecp256k1,
        TypeName::MsgSubmitProposal,
        TypeName::MsgDeposit,
        TypeName::MsgVote,
    ];

    /// The 4-byte amino prefix written before the encoded fields
    pub const fn prefix(self) -> [u8; 4] {
        match self {
            TypeName::MsgSend => [0x2a, 0x2c, 0x87, 0xfa],
            TypeName::NewOrderMsg => [0xce, 0x6d, 0xc0, 0x43],
            TypeName::CancelOrderMsg => [0x16, 0x6e, 0x68, 0x1b],
            TypeName::IssueMsg => [0x17, 0xef, 0xab, 0x80],
            TypeName::BurnMsg => [0x7e, 0xd2, 0xd2, 0xa0],
            TypeName::FreezeMsg => [0xe7, 0x74, 0xb3, 0x2d],
            TypeName::UnfreezeMsg => [0x65, 0x15, 0xff, 0x0d],
            TypeName::MintMsg => [0x46, 0x7e, 0x08, 0x29],
            TypeName::ListMsg => [0xb4, 0x1d, 0xe1, 0x3f],
            TypeName::StdTx => [0xf0, 0x62, 0x5d, 0xee],
            TypeName::PubKeySecp256k1 => [0xeb, 0x5a, 0xe9, 0x87],
            TypeName::SignatureSecp256k1 => [0x7f, 0xc4, 0xa4, 0x95],
            TypeName::MsgSubmitProposal => [0xb4, 0x2d, 0x61, 0x4e],
            TypeName::MsgDeposit => [0xa1, 0x8a, 0x56, 0xe5],
            TypeName::MsgVote => [0xa1, 0xca, 0xdd, 0x36],
        }
    }

    /// The name as it appears in the `msgType` field of an envelope
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeName::MsgSend => "MsgSend",
            TypeName::NewOrderMsg => "NewOrderMsg",
            TypeName::CancelOrderMsg => "CancelOrderMsg",
            TypeName::IssueMsg => "IssueMsg",
            TypeName::BurnMsg => "BurnMsg",
            TypeName::FreezeMsg => "FreezeMsg",
            TypeName::UnfreezeMsg => "UnfreezeMsg",
            TypeName::MintMsg => "MintMsg",
            TypeName::ListMsg => "ListMsg",
            TypeName::StdTx => "StdTx",
            TypeName::PubKeySecp256k1 => "PubKeySecp256k1",
            TypeName::SignatureSecp256k1 => "SignatureSecp256k1",
            TypeName::MsgSubmitProposal => "MsgSubmitProposal",
            TypeName::MsgDeposit => "MsgDeposit",
            TypeName::MsgVote => "MsgVote",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeName {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}
