//! Transfers: single-recipient transfer and multi-send

use bnc_codec::{Object, Value};
use bnc_math::{Coin, Coins};
use serde::{Deserialize, Serialize};

use super::validate::{require_non_empty, require_positive, scale_positive};
use super::{decode_address, AminoMsg, MsgPair, SignMsg};
use crate::address::AccAddress;
use crate::error::{TypesError, ValidationError};

/// One side of a transfer: an address and the coins it sends or receives
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputOutput {
    pub address: AccAddress,
    pub coins: Coins,
}

/// MsgSend moves coins from one set of accounts to another
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendMsg {
    pub inputs: Vec<InputOutput>,
    pub outputs: Vec<InputOutput>,
}

impl AminoMsg for SendMsg {
    fn append_fields(&self, obj: Object) -> Object {
        obj.field("inputs", legs_value(&self.inputs))
            .field("outputs", legs_value(&self.outputs))
    }

    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.inputs.is_empty() {
            return Err(ValidationError::new("inputs", "must not be empty"));
        }
        if self.outputs.is_empty() {
            return Err(ValidationError::new("outputs", "must not be empty"));
        }

        let mut input_total = Coins::empty();
        for (i, leg) in self.inputs.iter().enumerate() {
            validate_leg(&format!("inputs[{i}]"), leg)?;
            input_total
                .merge(&leg.coins)
                .map_err(|e| ValidationError::new("inputs", e.to_string()))?;
        }

        let mut output_total = Coins::empty();
        for (i, leg) in self.outputs.iter().enumerate() {
            validate_leg(&format!("outputs[{i}]"), leg)?;
            output_total
                .merge(&leg.coins)
                .map_err(|e| ValidationError::new("outputs", e.to_string()))?;
        }

        if input_total != output_total {
            return Err(ValidationError::new(
                "inputs",
                format!("sum of inputs {input_total} does not match sum of outputs {output_total}"),
            ));
        }
        Ok(())
    }
}

fn validate_leg(field: &str, leg: &InputOutput) -> Result<(), ValidationError> {
    if leg.coins.is_empty() {
        return Err(ValidationError::new(
            format!("{field}.coins"),
            "must not be empty",
        ));
    }
    for coin in leg.coins.iter() {
        require_non_empty(&format!("{field}.coins.denom"), &coin.denom)?;
        require_positive(&format!("{field}.coins.amount"), coin.amount)?;
    }
    Ok(())
}

fn legs_value(legs: &[InputOutput]) -> Value {
    let items = legs
        .iter()
        .map(|leg| {
            let coins = leg
                .coins
                .iter()
                .map(|coin| {
                    Object::anonymous()
                        .field("denom", coin.denom.as_str())
                        .field("amount", coin.amount)
                        .into()
                })
                .collect::<Vec<Value>>();
            Object::anonymous()
                .field("address", leg.address.as_bytes().to_vec())
                .field("coins", coins)
                .into()
        })
        .collect::<Vec<Value>>();
    Value::Array(items)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInputOutput {
    pub address: String,
    pub coins: Vec<Coin>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendSignMsg {
    pub inputs: Vec<SignInputOutput>,
    pub outputs: Vec<SignInputOutput>,
}

impl SendSignMsg {
    pub fn to_wire(&self) -> Result<SendMsg, TypesError> {
        let inputs = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, leg)| leg_to_wire(&format!("inputs[{i}]"), leg))
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .map(|(i, leg)| leg_to_wire(&format!("outputs[{i}]"), leg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SendMsg { inputs, outputs })
    }
}

fn leg_to_wire(field: &str, leg: &SignInputOutput) -> Result<InputOutput, TypesError> {
    let address = decode_address(&leg.address)?;

    let mut coins = Coins::empty();
    for coin in &leg.coins {
        let coin = Coin::new(coin.denom.clone(), coin.amount)
            .map_err(|e| ValidationError::new(format!("{field}.coins"), e.to_string()))?;
        coins
            .add(coin)
            .map_err(|e| ValidationError::new(format!("{field}.coins"), e.to_string()))?;
    }
    // Re-sorting would make the wire form diverge from the signed text.
    if coins.as_slice() != leg.coins.as_slice() {
        return Err(ValidationError::new(
            format!("{field}.coins"),
            "must be sorted by denom without duplicates",
        )
        .into());
    }
    Ok(InputOutput { address, coins })
}

/// Transfer `amount` of `denom` from one address to another
pub fn transfer(from: &str, to: &str, amount: &str, denom: &str) -> Result<MsgPair, TypesError> {
    decode_address(from)?;
    decode_address(to)?;
    require_non_empty("denom", denom)?;
    let amount = scale_positive("amount", amount)?;

    let coins = vec![Coin {
        denom: denom.to_string(),
        amount,
    }];
    let sign = SendSignMsg {
        inputs: vec![SignInputOutput {
            address: from.to_string(),
            coins: coins.clone(),
        }],
        outputs: vec![SignInputOutput {
            address: to.to_string(),
            coins,
        }],
    };
    MsgPair::from_sign(SignMsg::Send(sign))
}

/// A coin given as a human-readable decimal amount
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalCoin {
    pub denom: String,
    pub amount: String,
}

/// One recipient of a multi-send
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSendOutput {
    pub to: String,
    pub coins: Vec<DecimalCoin>,
}

/// Send coins from one address to several recipients in one message
///
/// Coins are consolidated and sorted per output, and the single input leg
/// carries the denom-wise sum of every output.
pub fn multi_send(from: &str, outputs: &[MultiSendOutput]) -> Result<MsgPair, TypesError> {
    require_non_empty("from", from)?;
    decode_address(from)?;
    if outputs.is_empty() {
        return Err(ValidationError::new("outputs", "must contain at least one output").into());
    }

    let mut total = Coins::empty();
    let mut sign_outputs = Vec::with_capacity(outputs.len());
    for (i, output) in outputs.iter().enumerate() {
        decode_address(&output.to)?;
        if output.coins.is_empty() {
            return Err(
                ValidationError::new(format!("outputs[{i}].coins"), "must not be empty").into(),
            );
        }

        let mut coins = Coins::empty();
        for coin in &output.coins {
            require_non_empty(&format!("outputs[{i}].coins.denom"), &coin.denom)?;
            let amount = scale_positive(&format!("outputs[{i}].coins.amount"), &coin.amount)?;
            coins
                .add(Coin {
                    denom: coin.denom.clone(),
                    amount,
                })
                .map_err(|e| ValidationError::new(format!("outputs[{i}].coins"), e.to_string()))?;
        }
        total
            .merge(&coins)
            .map_err(|e| ValidationError::new("outputs", e.to_string()))?;

        sign_outputs.push(SignInputOutput {
            address: output.to.clone(),
            coins: coins.into_vec(),
        });
    }

    let sign = SendSignMsg {
        inputs: vec![SignInputOutput {
            address: from.to_string(),
            coins: total.into_vec(),
        }],
        outputs: sign_outputs,
    };
    MsgPair::from_sign(SignMsg::Send(sign))
}
