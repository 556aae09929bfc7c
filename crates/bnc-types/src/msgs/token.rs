//! Token lifecycle messages: issue, freeze, unfreeze, burn and mint

use bnc_codec::Object;
use serde::{Deserialize, Serialize};

use super::validate::{
    require_max_supply, require_non_empty, require_positive, scale_positive,
    validate_suffixed_symbol, validate_symbol, validate_token_name,
};
use super::{decode_address, AminoMsg, MsgPair, SignMsg};
use crate::address::AccAddress;
use crate::error::{TypesError, ValidationError};

/// Issue a new token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueMsg {
    pub from: AccAddress,
    pub name: String,
    pub symbol: String,
    pub total_supply: i64,
    pub mintable: bool,
}

impl AminoMsg for IssueMsg {
    fn append_fields(&self, obj: Object) -> Object {
        obj.field("from", self.from.as_bytes().to_vec())
            .field("name", self.name.as_str())
            .field("symbol", self.symbol.as_str())
            .field("total_supply", self.total_supply)
            .field("mintable", self.mintable)
    }

    fn validate_basic(&self) -> Result<(), ValidationError> {
        validate_token_name("name", &self.name)?;
        validate_symbol("symbol", &self.symbol)?;
        require_max_supply("total_supply", self.total_supply)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueSignMsg {
    pub from: String,
    pub name: String,
    pub symbol: String,
    pub total_supply: i64,
    pub mintable: bool,
}

impl IssueSignMsg {
    pub fn to_wire(&self) -> Result<IssueMsg, TypesError> {
        Ok(IssueMsg {
            from: decode_address(&self.from)?,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            total_supply: self.total_supply,
            mintable: self.mintable,
        })
    }
}

/// Issue `total_supply` whole tokens named `name` under `symbol`
///
/// The supply bound applies to the scaled amount (`total_supply * 10^8`),
/// the int64 value carried on the wire.
pub fn issue(
    from: &str,
    name: &str,
    symbol: &str,
    total_supply: &str,
    mintable: bool,
) -> Result<MsgPair, TypesError> {
    require_non_empty("from", from)?;
    validate_token_name("name", name)?;
    validate_symbol("symbol", symbol)?;
    let total_supply = scale_positive("total_supply", total_supply)?;

    let sign = IssueSignMsg {
        from: from.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        total_supply,
        mintable,
    };
    MsgPair::from_sign(SignMsg::Issue(sign))
}

/// Wire form shared by freeze, unfreeze, burn and mint; the kind is carried
/// by the enclosing [`super::WireMsg`] variant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMsg {
    pub from: AccAddress,
    pub symbol: String,
    pub amount: i64,
}

impl AminoMsg for TokenMsg {
    fn append_fields(&self, obj: Object) -> Object {
        obj.field("from", self.from.as_bytes().to_vec())
            .field("symbol", self.symbol.as_str())
            .field("amount", self.amount)
    }

    fn validate_basic(&self) -> Result<(), ValidationError> {
        validate_suffixed_symbol("symbol", &self.symbol)?;
        require_positive("amount", self.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSignMsg {
    pub amount: i64,
    pub from: String,
    pub symbol: String,
}

impl TokenSignMsg {
    pub fn to_wire(&self) -> Result<TokenMsg, TypesError> {
        Ok(TokenMsg {
            from: decode_address(&self.from)?,
            symbol: self.symbol.clone(),
            amount: self.amount,
        })
    }
}

fn token_sign(from: &str, symbol: &str, amount: &str) -> Result<TokenSignMsg, TypesError> {
    validate_suffixed_symbol("symbol", symbol)?;
    let amount = scale_positive("amount", amount)?;
    Ok(TokenSignMsg {
        amount,
        from: from.to_string(),
        symbol: symbol.to_string(),
    })
}

pub fn freeze(from: &str, symbol: &str, amount: &str) -> Result<MsgPair, TypesError> {
    MsgPair::from_sign(SignMsg::Freeze(token_sign(from, symbol, amount)?))
}

pub fn unfreeze(from: &str, symbol: &str, amount: &str) -> Result<MsgPair, TypesError> {
    MsgPair::from_sign(SignMsg::Unfreeze(token_sign(from, symbol, amount)?))
}

pub fn burn(from: &str, symbol: &str, amount: &str) -> Result<MsgPair, TypesError> {
    MsgPair::from_sign(SignMsg::Burn(token_sign(from, symbol, amount)?))
}

/// Mint more of a mintable token
///
/// Like [`issue`], the supply bound applies to the scaled amount.
pub fn mint(from: &str, symbol: &str, amount: &str) -> Result<MsgPair, TypesError> {
    let sign = token_sign(from, symbol, amount)?;
    require_max_supply("amount", sign.amount)?;
    MsgPair::from_sign(SignMsg::Mint(sign))
}
