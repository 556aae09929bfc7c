//! Market listing proposal execution

use bnc_codec::Object;
use serde::{Deserialize, Serialize};

use super::validate::{require_non_empty, require_positive, scale_positive};
use super::{decode_address, AminoMsg, MsgPair, SignMsg};
use crate::address::AccAddress;
use crate::error::{TypesError, ValidationError};

/// List a trading pair approved by governance proposal `proposal_id`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListMsg {
    pub from: AccAddress,
    pub proposal_id: i64,
    pub base_asset_symbol: String,
    pub quote_asset_symbol: String,
    pub init_price: i64,
}

impl AminoMsg for ListMsg {
    fn append_fields(&self, obj: Object) -> Object {
        obj.field("from", self.from.as_bytes().to_vec())
            .field("proposal_id", self.proposal_id)
            .field("base_asset_symbol", self.base_asset_symbol.as_str())
            .field("quote_asset_symbol", self.quote_asset_symbol.as_str())
            .field("init_price", self.init_price)
    }

    fn validate_basic(&self) -> Result<(), ValidationError> {
        require_positive("proposal_id", self.proposal_id)?;
        require_non_empty("base_asset_symbol", &self.base_asset_symbol)?;
        require_non_empty("quote_asset_symbol", &self.quote_asset_symbol)?;
        require_positive("init_price", self.init_price)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSignMsg {
    pub base_asset_symbol: String,
    pub from: String,
    pub init_price: i64,
    pub proposal_id: i64,
    pub quote_asset_symbol: String,
}

impl ListSignMsg {
    pub fn to_wire(&self) -> Result<ListMsg, TypesError> {
        Ok(ListMsg {
            from: decode_address(&self.from)?,
            proposal_id: self.proposal_id,
            base_asset_symbol: self.base_asset_symbol.clone(),
            quote_asset_symbol: self.quote_asset_symbol.clone(),
            init_price: self.init_price,
        })
    }
}

pub fn list(
    from: &str,
    proposal_id: i64,
    base_asset: &str,
    quote_asset: &str,
    init_price: &str,
) -> Result<MsgPair, TypesError> {
    require_non_empty("address", from)?;
    require_positive("proposal_id", proposal_id)?;
    let init_price = scale_positive("init_price", init_price)?;

    let sign = ListSignMsg {
        base_asset_symbol: base_asset.to_string(),
        from: from.to_string(),
        init_price,
        proposal_id,
        quote_asset_symbol: quote_asset.to_string(),
    };
    MsgPair::from_sign(SignMsg::List(sign))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_list_golden_bytes() {
        let pair = list(ADDR_A, 10, "ADA.B-B63", "BNB", "1").unwrap();
        assert_eq!(
            hex::encode(pair.wire.marshal().unwrap()),
            "31b41de13f0a14751e76e8199196d454941c45d1b3a323f1433bd6100a1a094144412e422d4236332203424e422880c2d72f"
        );
    }

    #[test]
    fn test_list_validation() {
        match list(ADDR_A, 0, "ADA.B-B63", "BNB", "1") {
            Err(TypesError::Validation(e)) => assert_eq!(e.field, "proposal_id"),
            other => panic!("expected proposal_id error, got {other:?}"),
        }
        match list(ADDR_A, 1, "ADA.B-B63", "BNB", "0") {
            Err(TypesError::Validation(e)) => assert_eq!(e.field, "init_price"),
            other => panic!("expected init_price error, got {other:?}"),
        }
        match list(ADDR_A, 1, "", "BNB", "1") {
            Err(TypesError::Validation(e)) => assert_eq!(e.field, "base_asset_symbol"),
            other => panic!("expected base asset error, got {other:?}"),
        }
        match list(ADDR_A, 1, "ADA.B-B63", "", "1") {
            Err(TypesError::Validation(e)) => assert_eq!(e.field, "quote_asset_symbol"),
            other => panic!("expected quote asset error, got {other:?}"),
        }
    }
}
