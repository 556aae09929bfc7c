//! Transaction message kinds
//!
//! Each kind has a wire struct, encoded positionally by the amino codec, and
//! a sign struct, serialized into the sign document. Constructors validate
//! their arguments, build the sign form, and derive the wire form from it
//! through [`SignMsg::to_wire`], the same conversion used when an envelope
//! is parsed. The two forms can therefore never drift apart.

pub mod list;
pub mod order;
pub mod send;
pub mod token;
pub mod validate;

use bnc_codec::{Object, TypeName, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::address::AccAddress;
use crate::error::{TypesError, ValidationError};

pub use list::{list, ListMsg, ListSignMsg};
pub use order::{
    cancel_order, new_order, order_id, CancelOrderMsg, CancelOrderSignMsg, NewOrderMsg,
    NewOrderSignMsg, Side, TimeInForce, ORDER_TYPE_LIMIT,
};
pub use send::{
    multi_send, transfer, DecimalCoin, InputOutput, MultiSendOutput, SendMsg, SendSignMsg,
    SignInputOutput,
};
pub use token::{burn, freeze, issue, mint, unfreeze, IssueMsg, IssueSignMsg, TokenMsg, TokenSignMsg};

/// A message with an amino wire representation
pub trait AminoMsg {
    /// Append this message's fields in wire declaration order
    fn append_fields(&self, obj: Object) -> Object;

    /// Perform stateless validation
    fn validate_basic(&self) -> Result<(), ValidationError>;
}

/// Wire form of every supported message kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireMsg {
    Send(SendMsg),
    NewOrder(NewOrderMsg),
    CancelOrder(CancelOrderMsg),
    List(ListMsg),
    Issue(IssueMsg),
    Freeze(TokenMsg),
    Unfreeze(TokenMsg),
    Burn(TokenMsg),
    Mint(TokenMsg),
}

impl WireMsg {
    pub fn type_name(&self) -> TypeName {
        match self {
            WireMsg::Send(_) => TypeName::MsgSend,
            WireMsg::NewOrder(_) => TypeName::NewOrderMsg,
            WireMsg::CancelOrder(_) => TypeName::CancelOrderMsg,
            WireMsg::List(_) => TypeName::ListMsg,
            WireMsg::Issue(_) => TypeName::IssueMsg,
            WireMsg::Freeze(_) => TypeName::FreezeMsg,
            WireMsg::Unfreeze(_) => TypeName::UnfreezeMsg,
            WireMsg::Burn(_) => TypeName::BurnMsg,
            WireMsg::Mint(_) => TypeName::MintMsg,
        }
    }

    fn inner(&self) -> &dyn AminoMsg {
        match self {
            WireMsg::Send(m) => m,
            WireMsg::NewOrder(m) => m,
            WireMsg::CancelOrder(m) => m,
            WireMsg::List(m) => m,
            WireMsg::Issue(m) => m,
            WireMsg::Freeze(m) | WireMsg::Unfreeze(m) | WireMsg::Burn(m) | WireMsg::Mint(m) => m,
        }
    }

    /// The typed amino object, carrying this kind's prefix
    pub fn to_object(&self) -> Object {
        self.inner().append_fields(Object::typed(self.type_name()))
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }

    /// Amino encoding with length prefix
    pub fn marshal(&self) -> bnc_codec::Result<Vec<u8>> {
        bnc_codec::marshal(&self.to_value())
    }

    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        self.inner().validate_basic()?;
        if let WireMsg::Mint(m) = self {
            validate::require_max_supply("amount", m.amount)?;
        }
        Ok(())
    }
}

/// Sign form of every supported message kind, serialized without a tag
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SignMsg {
    Send(SendSignMsg),
    NewOrder(NewOrderSignMsg),
    CancelOrder(CancelOrderSignMsg),
    List(ListSignMsg),
    Issue(IssueSignMsg),
    Freeze(TokenSignMsg),
    Unfreeze(TokenSignMsg),
    Burn(TokenSignMsg),
    Mint(TokenSignMsg),
}

impl SignMsg {
    pub fn type_name(&self) -> TypeName {
        match self {
            SignMsg::Send(_) => TypeName::MsgSend,
            SignMsg::NewOrder(_) => TypeName::NewOrderMsg,
            SignMsg::CancelOrder(_) => TypeName::CancelOrderMsg,
            SignMsg::List(_) => TypeName::ListMsg,
            SignMsg::Issue(_) => TypeName::IssueMsg,
            SignMsg::Freeze(_) => TypeName::FreezeMsg,
            SignMsg::Unfreeze(_) => TypeName::UnfreezeMsg,
            SignMsg::Burn(_) => TypeName::BurnMsg,
            SignMsg::Mint(_) => TypeName::MintMsg,
        }
    }

    /// Read a sign-form message of kind `type_name` back from JSON
    pub fn from_json(type_name: TypeName, value: serde_json::Value) -> Result<Self, TypesError> {
        let msg = match type_name {
            TypeName::MsgSend => SignMsg::Send(parse_json(type_name, value)?),
            TypeName::NewOrderMsg => SignMsg::NewOrder(parse_json(type_name, value)?),
            TypeName::CancelOrderMsg => SignMsg::CancelOrder(parse_json(type_name, value)?),
            TypeName::ListMsg => SignMsg::List(parse_json(type_name, value)?),
            TypeName::IssueMsg => SignMsg::Issue(parse_json(type_name, value)?),
            TypeName::FreezeMsg => SignMsg::Freeze(parse_json(type_name, value)?),
            TypeName::UnfreezeMsg => SignMsg::Unfreeze(parse_json(type_name, value)?),
            TypeName::BurnMsg => SignMsg::Burn(parse_json(type_name, value)?),
            TypeName::MintMsg => SignMsg::Mint(parse_json(type_name, value)?),
            other => return Err(TypesError::UnsupportedMessageType(other.to_string())),
        };
        Ok(msg)
    }

    /// Decode embedded addresses and build the validated wire form
    pub fn to_wire(&self) -> Result<WireMsg, TypesError> {
        let wire = match self {
            SignMsg::Send(m) => WireMsg::Send(m.to_wire()?),
            SignMsg::NewOrder(m) => WireMsg::NewOrder(m.to_wire()?),
            SignMsg::CancelOrder(m) => WireMsg::CancelOrder(m.to_wire()?),
            SignMsg::List(m) => WireMsg::List(m.to_wire()?),
            SignMsg::Issue(m) => WireMsg::Issue(m.to_wire()?),
            SignMsg::Freeze(m) => WireMsg::Freeze(m.to_wire()?),
            SignMsg::Unfreeze(m) => WireMsg::Unfreeze(m.to_wire()?),
            SignMsg::Burn(m) => WireMsg::Burn(m.to_wire()?),
            SignMsg::Mint(m) => WireMsg::Mint(m.to_wire()?),
        };
        wire.validate_basic()?;
        Ok(wire)
    }
}

/// Both representations of one logical message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgPair {
    pub wire: WireMsg,
    pub sign: SignMsg,
}

impl MsgPair {
    /// Derive the wire form from `sign`
    pub fn from_sign(sign: SignMsg) -> Result<Self, TypesError> {
        let wire = sign.to_wire()?;
        Ok(Self { wire, sign })
    }

    pub fn type_name(&self) -> TypeName {
        self.wire.type_name()
    }
}

fn parse_json<T: DeserializeOwned>(
    type_name: TypeName,
    value: serde_json::Value,
) -> Result<T, TypesError> {
    serde_json::from_value(value).map_err(|e| TypesError::MalformedMessage {
        msg_type: type_name.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a bech32 address argument
pub(crate) fn decode_address(address: &str) -> Result<AccAddress, TypesError> {
    let (_, addr) = AccAddress::from_bech32(address)?;
    Ok(addr)
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Address of private key 0x01 on testnet
    pub const ADDR_A: &str = "tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8";
    pub const ADDR_A_HEX: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";
    /// Address of private key 0x02 on testnet
    pub const ADDR_B: &str = "tbnb1q6hag67dl53wl99vzg42z8eyzfz2xlkvujs5hn";
    /// Address of private key 0x03 on testnet
    pub const ADDR_C: &str = "tbnb10ht9tyks4vh7p5p904t340cr9nvahy7utg3a86";
}
