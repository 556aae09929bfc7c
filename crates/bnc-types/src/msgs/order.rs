//! DEX order messages: place and cancel

use bnc_codec::Object;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validate::{require_non_empty, require_positive, scale_positive};
use super::{decode_address, AminoMsg, MsgPair, SignMsg};
use crate::address::AccAddress;
use crate::error::{TypesError, ValidationError};

/// The only order type the chain accepts
pub const ORDER_TYPE_LIMIT: i64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Buy = 1,
    Sell = 2,
}

impl TryFrom<i64> for Side {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Side::Buy),
            2 => Ok(Side::Sell),
            other => Err(ValidationError::new(
                "side",
                format!("must be 1 (buy) or 2 (sell), got {other}"),
            )),
        }
    }
}

impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" | "1" => Ok(Side::Buy),
            "sell" | "2" => Ok(Side::Sell),
            _ => Err(ValidationError::new(
                "side",
                format!("expected buy or sell, got {s:?}"),
            )),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeInForce {
    /// Good till expire
    #[default]
    Gtc = 1,
    /// Immediate or cancel
    Ioc = 3,
}

impl TryFrom<i64> for TimeInForce {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TimeInForce::Gtc),
            3 => Ok(TimeInForce::Ioc),
            other => Err(ValidationError::new(
                "timeinforce",
                format!("must be 1 (GTC) or 3 (IOC), got {other}"),
            )),
        }
    }
}

impl FromStr for TimeInForce {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gtc" | "1" => Ok(TimeInForce::Gtc),
            "ioc" | "3" => Ok(TimeInForce::Ioc),
            _ => Err(ValidationError::new(
                "timeinforce",
                format!("expected gtc or ioc, got {s:?}"),
            )),
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::Gtc => f.write_str("gtc"),
            TimeInForce::Ioc => f.write_str("ioc"),
        }
    }
}

/// Order id the chain expects for an order placed at `sequence`
pub fn order_id(sender: &AccAddress, sequence: u64) -> Result<String, ValidationError> {
    let next = sequence
        .checked_add(1)
        .ok_or_else(|| ValidationError::new("sequence", "is at its maximum value"))?;
    Ok(format!("{}-{}", sender.to_hex_upper(), next))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrderMsg {
    pub sender: AccAddress,
    pub id: String,
    pub symbol: String,
    pub order_type: i64,
    pub side: Side,
    pub price: i64,
    pub quantity: i64,
    pub time_in_force: TimeInForce,
}

impl AminoMsg for NewOrderMsg {
    fn append_fields(&self, obj: Object) -> Object {
        obj.field("sender", self.sender.as_bytes().to_vec())
            .field("id", self.id.as_str())
            .field("symbol", self.symbol.as_str())
            .field("ordertype", self.order_type)
            .field("side", self.side as i64)
            .field("price", self.price)
            .field("quantity", self.quantity)
            .field("timeinforce", self.time_in_force as i64)
    }

    fn validate_basic(&self) -> Result<(), ValidationError> {
        require_non_empty("symbol", &self.symbol)?;
        let prefix = format!("{}-", self.sender.to_hex_upper());
        let counter = self.id.strip_prefix(&prefix).unwrap_or_default();
        if counter.is_empty() || !counter.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new(
                "id",
                format!("{:?} is not an order id of the sender", self.id),
            ));
        }
        if self.order_type != ORDER_TYPE_LIMIT {
            return Err(ValidationError::new(
                "ordertype",
                format!("only limit orders ({ORDER_TYPE_LIMIT}) are supported"),
            ));
        }
        require_positive("price", self.price)?;
        require_positive("quantity", self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewOrderSignMsg {
    pub id: String,
    pub ordertype: i64,
    pub price: i64,
    pub quantity: i64,
    pub sender: String,
    pub side: i64,
    pub symbol: String,
    pub timeinforce: i64,
}

impl NewOrderSignMsg {
    pub fn to_wire(&self) -> Result<NewOrderMsg, TypesError> {
        Ok(NewOrderMsg {
            sender: decode_address(&self.sender)?,
            id: self.id.clone(),
            symbol: self.symbol.clone(),
            order_type: self.ordertype,
            side: Side::try_from(self.side)?,
            price: self.price,
            quantity: self.quantity,
            time_in_force: TimeInForce::try_from(self.timeinforce)?,
        })
    }
}

/// Place a limit order; `sequence` is the sender's current sequence
pub fn new_order(
    sender: &str,
    symbol: &str,
    side: Side,
    price: &str,
    quantity: &str,
    time_in_force: TimeInForce,
    sequence: u64,
) -> Result<MsgPair, TypesError> {
    require_non_empty("address", sender)?;
    require_non_empty("symbol", symbol)?;
    let sender_addr = decode_address(sender)?;
    let price = scale_positive("price", price)?;
    let quantity = scale_positive("quantity", quantity)?;

    let sign = NewOrderSignMsg {
        id: order_id(&sender_addr, sequence)?,
        ordertype: ORDER_TYPE_LIMIT,
        price,
        quantity,
        sender: sender.to_string(),
        side: side as i64,
        symbol: symbol.to_string(),
        timeinforce: time_in_force as i64,
    };
    MsgPair::from_sign(SignMsg::NewOrder(sign))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancelOrderMsg {
    pub sender: AccAddress,
    pub symbol: String,
    pub refid: String,
}

impl AminoMsg for CancelOrderMsg {
    fn append_fields(&self, obj: Object) -> Object {
        obj.field("sender", self.sender.as_bytes().to_vec())
            .field("symbol", self.symbol.as_str())
            .field("refid", self.refid.as_str())
    }

    fn validate_basic(&self) -> Result<(), ValidationError> {
        require_non_empty("symbol", &self.symbol)?;
        require_non_empty("refid", &self.refid)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CancelOrderSignMsg {
    pub refid: String,
    pub sender: String,
    pub symbol: String,
}

impl CancelOrderSignMsg {
    pub fn to_wire(&self) -> Result<CancelOrderMsg, TypesError> {
        Ok(CancelOrderMsg {
            sender: decode_address(&self.sender)?,
            symbol: self.symbol.clone(),
            refid: self.refid.clone(),
        })
    }
}

/// Cancel the order `refid` on market `symbol`
pub fn cancel_order(sender: &str, symbol: &str, refid: &str) -> Result<MsgPair, TypesError> {
    let sign = CancelOrderSignMsg {
        refid: refid.to_string(),
        sender: sender.to_string(),
        symbol: symbol.to_string(),
    };
    MsgPair::from_sign(SignMsg::CancelOrder(sign))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::WireMsg;
    use super::*;

    #[test]
    fn test_order_id_uses_next_sequence() {
        let pair = new_order(
            ADDR_A,
            "BNB_BTC",
            Side::Buy,
            "1.5",
            "10",
            TimeInForce::Gtc,
            7,
        )
        .unwrap();
        let SignMsg::NewOrder(sign) = &pair.sign else {
            panic!("expected order sign form");
        };
        assert_eq!(sign.id, format!("{}-8", ADDR_A_HEX.to_uppercase()));
        assert_eq!(sign.price, 150_000_000);
        assert_eq!(sign.quantity, 1_000_000_000);
        assert_eq!(sign.ordertype, ORDER_TYPE_LIMIT);
    }

    #[test]
    fn test_new_order_golden_bytes() {
        let pair = new_order(
            ADDR_A,
            "ADA.B-B63_BNB",
            Side::Buy,
            "0.00396",
            "12",
            TimeInForce::Gtc,
            31,
        )
        .unwrap();
        assert_eq!(
            hex::encode(pair.wire.marshal().unwrap()),
            "66ce6dc0430a14751e76e8199196d454941c45d1b3a323f1433bd6122b373531453736453831393931393644343534393431433435443142334133323346313433334244362d33321a0d4144412e422d4236335f424e422002280130e095183880989abc044001"
        );
    }

    #[test]
    fn test_side_and_time_in_force_ranges() {
        assert_eq!(Side::try_from(2).unwrap(), Side::Sell);
        assert!(Side::try_from(3).is_err());
        assert_eq!(TimeInForce::try_from(3).unwrap(), TimeInForce::Ioc);
        assert!(TimeInForce::try_from(2).is_err());
        assert_eq!(TimeInForce::default(), TimeInForce::Gtc);

        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!("ioc".parse::<TimeInForce>().unwrap(), TimeInForce::Ioc);
        assert!("fok".parse::<TimeInForce>().is_err());
    }

    #[test]
    fn test_new_order_validation() {
        assert!(matches!(
            new_order(ADDR_A, "", Side::Buy, "1", "1", TimeInForce::Gtc, 0),
            Err(TypesError::Validation(_))
        ));
        match new_order(ADDR_A, "BNB_BTC", Side::Buy, "0", "1", TimeInForce::Gtc, 0) {
            Err(TypesError::Validation(e)) => assert_eq!(e.field, "price"),
            other => panic!("expected price validation error, got {other:?}"),
        }
        assert!(matches!(
            new_order(ADDR_A, "BNB_BTC", Side::Buy, "1", "1", TimeInForce::Gtc, u64::MAX),
            Err(TypesError::Validation(_))
        ));
    }

    #[test]
    fn test_foreign_order_id_rejected() {
        let sign = NewOrderSignMsg {
            id: "0000000000000000000000000000000000000000-1".to_string(),
            ordertype: ORDER_TYPE_LIMIT,
            price: 1,
            quantity: 1,
            sender: ADDR_A.to_string(),
            side: 1,
            symbol: "BNB_BTC".to_string(),
            timeinforce: 1,
        };
        assert!(matches!(
            SignMsg::NewOrder(sign).to_wire(),
            Err(TypesError::Validation(_))
        ));
    }

    #[test]
    fn test_cancel_order() {
        let pair = cancel_order(ADDR_A, "BNB_BTC.B-918", "A-5").unwrap();
        assert!(matches!(pair.wire, WireMsg::CancelOrder(_)));
        assert_eq!(
            hex::encode(pair.wire.marshal().unwrap()),
            "2e166e681b0a14751e76e8199196d454941c45d1b3a323f1433bd6120d424e425f4254432e422d3931381a03412d35"
        );

        match cancel_order(ADDR_A, "BNB_BTC", "") {
            Err(TypesError::Validation(e)) => assert_eq!(e.field, "refid"),
            other => panic!("expected refid validation error, got {other:?}"),
        }
    }
}
