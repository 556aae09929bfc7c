//! Transaction builder
//!
//! A [`TransactionBuilder`] carries the context every transaction needs
//! (network, account number, sequence and memo) and turns a [`TxAction`]
//! into a [`Transaction`] holding the wire message and the sign document
//! built from the same validated arguments.

use bnc_codec::{canonical_json, TypeName};
use bnc_types::msgs::{self, MultiSendOutput, Side, TimeInForce};
use bnc_types::{MsgPair, Network, SignMsg, TypesError, WireMsg};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::envelope::serialize_envelope;
use crate::TxError;

/// Value of the `source` field in sign documents and signed transactions
pub const SOURCE: i64 = 1;

/// Arguments of the token operations that move an amount of one symbol
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenAction {
    pub from: String,
    pub symbol: String,
    /// Decimal amount, scaled by 10^8 when the message is built
    pub amount: String,
}

/// Every transaction kind the builder can create
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxAction {
    Transfer {
        from: String,
        to: String,
        amount: String,
        denom: String,
    },
    MultiSend {
        from: String,
        outputs: Vec<MultiSendOutput>,
    },
    CancelOrder {
        sender: String,
        symbol: String,
        refid: String,
    },
    PlaceOrder {
        sender: String,
        symbol: String,
        side: Side,
        price: String,
        quantity: String,
        time_in_force: TimeInForce,
    },
    List {
        from: String,
        proposal_id: i64,
        base_asset: String,
        quote_asset: String,
        init_price: String,
    },
    Issue {
        from: String,
        name: String,
        symbol: String,
        total_supply: String,
        mintable: bool,
    },
    Freeze(TokenAction),
    Unfreeze(TokenAction),
    Burn(TokenAction),
    Mint(TokenAction),
}

impl TxAction {
    pub fn type_name(&self) -> TypeName {
        match self {
            TxAction::Transfer { .. } | TxAction::MultiSend { .. } => TypeName::MsgSend,
            TxAction::CancelOrder { .. } => TypeName::CancelOrderMsg,
            TxAction::PlaceOrder { .. } => TypeName::NewOrderMsg,
            TxAction::List { .. } => TypeName::ListMsg,
            TxAction::Issue { .. } => TypeName::IssueMsg,
            TxAction::Freeze(_) => TypeName::FreezeMsg,
            TxAction::Unfreeze(_) => TypeName::UnfreezeMsg,
            TxAction::Burn(_) => TypeName::BurnMsg,
            TxAction::Mint(_) => TypeName::MintMsg,
        }
    }

    /// Build both message forms. `sequence` feeds the order id of a new
    /// order and is ignored by every other kind.
    fn build(&self, sequence: u64) -> Result<MsgPair, TypesError> {
        match self {
            TxAction::Transfer {
                from,
                to,
                amount,
                denom,
            } => msgs::transfer(from, to, amount, denom),
            TxAction::MultiSend { from, outputs } => msgs::multi_send(from, outputs),
            TxAction::CancelOrder {
                sender,
                symbol,
                refid,
            } => msgs::cancel_order(sender, symbol, refid),
            TxAction::PlaceOrder {
                sender,
                symbol,
                side,
                price,
                quantity,
                time_in_force,
            } => msgs::new_order(
                sender,
                symbol,
                *side,
                price,
                quantity,
                *time_in_force,
                sequence,
            ),
            TxAction::List {
                from,
                proposal_id,
                base_asset,
                quote_asset,
                init_price,
            } => msgs::list(from, *proposal_id, base_asset, quote_asset, init_price),
            TxAction::Issue {
                from,
                name,
                symbol,
                total_supply,
                mintable,
            } => msgs::issue(from, name, symbol, total_supply, *mintable),
            TxAction::Freeze(t) => msgs::freeze(&t.from, &t.symbol, &t.amount),
            TxAction::Unfreeze(t) => msgs::unfreeze(&t.from, &t.symbol, &t.amount),
            TxAction::Burn(t) => msgs::burn(&t.from, &t.symbol, &t.amount),
            TxAction::Mint(t) => msgs::mint(&t.from, &t.symbol, &t.amount),
        }
    }
}

/// The document whose canonical JSON is signed
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignDoc {
    pub account_number: String,
    pub chain_id: String,
    /// Always null
    pub data: Option<String>,
    pub memo: String,
    #[serde(rename = "msgs", serialize_with = "serialize_single")]
    pub msg: SignMsg,
    pub sequence: String,
    pub source: String,
}

fn serialize_single<S: Serializer>(msg: &SignMsg, serializer: S) -> Result<S::Ok, S::Error> {
    std::slice::from_ref(msg).serialize(serializer)
}

impl SignDoc {
    pub fn new(
        network: Network,
        account_number: u64,
        sequence: u64,
        memo: &str,
        msg: SignMsg,
    ) -> Self {
        Self {
            account_number: account_number.to_string(),
            chain_id: network.chain_id().to_string(),
            data: None,
            memo: memo.to_string(),
            msg,
            sequence: sequence.to_string(),
            source: SOURCE.to_string(),
        }
    }

    /// Canonical JSON of this document: the exact bytes that get signed
    pub fn sign_bytes(&self) -> bnc_codec::Result<Vec<u8>> {
        canonical_json(self)
    }
}

/// An unsigned single-message transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub network: Network,
    pub chain_id: String,
    pub msg_type: TypeName,
    pub account_number: u64,
    pub sequence: u64,
    pub msg: WireMsg,
    pub memo: String,
    pub sign_doc: SignDoc,
}

impl Transaction {
    /// Stamp nonce, memo and chain id onto a validated message pair
    pub(crate) fn prepare(
        network: Network,
        account_number: u64,
        sequence: u64,
        memo: &str,
        pair: MsgPair,
    ) -> Self {
        let MsgPair { wire, sign } = pair;
        Self {
            network,
            chain_id: network.chain_id().to_string(),
            msg_type: wire.type_name(),
            account_number,
            sequence,
            msg: wire,
            memo: memo.to_string(),
            sign_doc: SignDoc::new(network, account_number, sequence, memo, sign),
        }
    }

    /// The wire messages, always exactly one
    pub fn msgs(&self) -> &[WireMsg] {
        std::slice::from_ref(&self.msg)
    }

    pub fn sign_msg(&self) -> &SignMsg {
        &self.sign_doc.msg
    }
}

/// Resolve the nonce pair, rejecting a missing sequence or a missing or
/// zero account number
pub(crate) fn require_nonce(
    account_number: Option<u64>,
    sequence: Option<u64>,
) -> Result<(u64, u64), TxError> {
    let sequence = sequence.ok_or(TxError::MissingNonce)?;
    match account_number {
        Some(n) if n > 0 => Ok((n, sequence)),
        _ => Err(TxError::MissingAccountNumber),
    }
}

/// Builder for unsigned transactions
#[derive(Clone, Debug, Default)]
pub struct TransactionBuilder {
    network: Network,
    account_number: Option<u64>,
    sequence: Option<u64>,
    memo: String,
}

impl TransactionBuilder {
    /// Create a builder for `network` with no nonce and an empty memo
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    pub fn account_number(mut self, account_number: u64) -> Self {
        self.account_number = Some(account_number);
        self
    }

    pub fn sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn memo<S: Into<String>>(mut self, memo: S) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Validate `action` and build the unsigned transaction
    pub fn create(&self, action: &TxAction) -> Result<Transaction, TxError> {
        let (account_number, sequence) = require_nonce(self.account_number, self.sequence)?;
        let pair = action.build(sequence)?;

        debug!(
            msg_type = %pair.type_name(),
            network = %self.network,
            account_number,
            sequence,
            "built transaction"
        );

        Ok(Transaction::prepare(
            self.network,
            account_number,
            sequence,
            &self.memo,
            pair,
        ))
    }

    /// Build the transaction and serialize it to an unsigned envelope
    pub fn create_envelope(&self, action: &TxAction) -> Result<String, TxError> {
        serialize_envelope(&self.create(action)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bnc_types::msgs::DecimalCoin;

    const ADDR_A: &str = "tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8";
    const ADDR_B: &str = "tbnb1q6hag67dl53wl99vzg42z8eyzfz2xlkvujs5hn";
    const ADDR_C: &str = "tbnb10ht9tyks4vh7p5p904t340cr9nvahy7utg3a86";

    fn builder() -> TransactionBuilder {
        TransactionBuilder::new(Network::Testnet)
            .account_number(34)
            .sequence(31)
    }

    fn token(symbol: &str, amount: &str) -> TokenAction {
        TokenAction {
            from: ADDR_A.to_string(),
            symbol: symbol.to_string(),
            amount: amount.to_string(),
        }
    }

    fn sign_text(tx: &Transaction) -> String {
        String::from_utf8(tx.sign_doc.sign_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_transfer_sign_doc() {
        let action = TxAction::Transfer {
            from: ADDR_A.to_string(),
            to: ADDR_B.to_string(),
            amount: "1.5".to_string(),
            denom: "BNB".to_string(),
        };
        let tx = builder().memo("test").create(&action).unwrap();

        assert_eq!(tx.msg_type, TypeName::MsgSend);
        assert_eq!(tx.chain_id, "Binance-Chain-Nile");
        assert_eq!(tx.msgs().len(), 1);
        assert_eq!(
            sign_text(&tx),
            concat!(
                r#"{"account_number":"34","chain_id":"Binance-Chain-Nile","data":null,"memo":"test","#,
                r#""msgs":[{"inputs":[{"address":"tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8","coins":[{"amount":150000000,"denom":"BNB"}]}],"#,
                r#""outputs":[{"address":"tbnb1q6hag67dl53wl99vzg42z8eyzfz2xlkvujs5hn","coins":[{"amount":150000000,"denom":"BNB"}]}]}],"#,
                r#""sequence":"31","source":"1"}"#
            )
        );
    }

    #[test]
    fn test_place_order_sign_doc() {
        let action = TxAction::PlaceOrder {
            sender: ADDR_A.to_string(),
            symbol: "ADA.B-B63_BNB".to_string(),
            side: Side::Buy,
            price: "0.00396".to_string(),
            quantity: "12".to_string(),
            time_in_force: TimeInForce::Gtc,
        };
        let tx = builder().create(&action).unwrap();

        assert_eq!(tx.msg_type, TypeName::NewOrderMsg);
        assert_eq!(
            sign_text(&tx),
            concat!(
                r#"{"account_number":"34","chain_id":"Binance-Chain-Nile","data":null,"memo":"","#,
                r#""msgs":[{"id":"751E76E8199196D454941C45D1B3A323F1433BD6-32","ordertype":2,"price":396000,"#,
                r#""quantity":1200000000,"sender":"tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8","side":1,"#,
                r#""symbol":"ADA.B-B63_BNB","timeinforce":1}],"sequence":"31","source":"1"}"#
            )
        );
    }

    #[test]
    fn test_order_id_uses_next_sequence() {
        let action = TxAction::PlaceOrder {
            sender: ADDR_A.to_string(),
            symbol: "BNB_BTC".to_string(),
            side: Side::Buy,
            price: "1.5".to_string(),
            quantity: "10".to_string(),
            time_in_force: TimeInForce::Gtc,
        };
        let tx = TransactionBuilder::new(Network::Testnet)
            .account_number(1)
            .sequence(7)
            .create(&action)
            .unwrap();

        match tx.sign_msg() {
            SignMsg::NewOrder(order) => {
                assert_eq!(order.id, "751E76E8199196D454941C45D1B3A323F1433BD6-8")
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_multi_send_sign_doc() {
        let coin = |denom: &str, amount: &str| DecimalCoin {
            denom: denom.to_string(),
            amount: amount.to_string(),
        };
        let action = TxAction::MultiSend {
            from: ADDR_A.to_string(),
            outputs: vec![
                MultiSendOutput {
                    to: ADDR_B.to_string(),
                    coins: vec![coin("BNB", "5")],
                },
                MultiSendOutput {
                    to: ADDR_C.to_string(),
                    coins: vec![coin("BTC", "2"), coin("BNB", "5")],
                },
            ],
        };
        let tx = builder().memo("test").create(&action).unwrap();

        assert!(sign_text(&tx).contains(
            r#""inputs":[{"address":"tbnb1w508d6qejxtdg4y5r3zarvary0c5xw7kkvpjw8","coins":[{"amount":1000000000,"denom":"BNB"},{"amount":200000000,"denom":"BTC"}]}]"#
        ));
    }

    #[test]
    fn test_token_actions() {
        let cases = [
            (TxAction::Freeze(token("XYZ-D06", "1")), TypeName::FreezeMsg),
            (TxAction::Unfreeze(token("XYZ-D06", "1")), TypeName::UnfreezeMsg),
            (TxAction::Burn(token("XYZ-D06", "1")), TypeName::BurnMsg),
            (TxAction::Mint(token("XYZ-D06", "100")), TypeName::MintMsg),
        ];
        for (action, expected) in cases {
            assert_eq!(action.type_name(), expected);
            let tx = builder().create(&action).unwrap();
            assert_eq!(tx.msg_type, expected);
            assert_eq!(tx.msg.type_name(), expected);
        }
    }

    #[test]
    fn test_missing_nonce() {
        let action = TxAction::CancelOrder {
            sender: ADDR_A.to_string(),
            symbol: "BNB_BTC.B-918".to_string(),
            refid: "A-5".to_string(),
        };

        let no_sequence = TransactionBuilder::new(Network::Testnet).account_number(34);
        assert!(matches!(
            no_sequence.create(&action),
            Err(TxError::MissingNonce)
        ));

        let no_account = TransactionBuilder::new(Network::Testnet).sequence(0);
        assert!(matches!(
            no_account.create(&action),
            Err(TxError::MissingAccountNumber)
        ));

        let zero_account = no_account.account_number(0);
        assert!(matches!(
            zero_account.create(&action),
            Err(TxError::MissingAccountNumber)
        ));

        let ok = TransactionBuilder::new(Network::Testnet)
            .account_number(34)
            .sequence(0);
        assert_eq!(ok.create(&action).unwrap().sequence, 0);
    }

    #[test]
    fn test_validation_errors_name_the_field() {
        let zero_transfer = TxAction::Transfer {
            from: ADDR_A.to_string(),
            to: ADDR_B.to_string(),
            amount: "0".to_string(),
            denom: "BNB".to_string(),
        };
        match builder().create(&zero_transfer) {
            Err(TxError::Validation(e)) => assert_eq!(e.field, "amount"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let short_symbol = TxAction::Issue {
            from: ADDR_A.to_string(),
            name: "Fake Token".to_string(),
            symbol: "ab".to_string(),
            total_supply: "1000".to_string(),
            mintable: false,
        };
        match builder().create(&short_symbol) {
            Err(TxError::Validation(e)) => assert_eq!(e.field, "symbol"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_address() {
        let action = TxAction::Transfer {
            from: "tbnb1notanaddress".to_string(),
            to: ADDR_B.to_string(),
            amount: "1".to_string(),
            denom: "BNB".to_string(),
        };
        assert!(matches!(
            builder().create(&action),
            Err(TxError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_default_network_is_mainnet() {
        let builder = TransactionBuilder::default();
        assert_eq!(builder.network(), Network::Mainnet);

        let action = TxAction::List {
            from: ADDR_A.to_string(),
            proposal_id: 10,
            base_asset: "ADA.B-B63".to_string(),
            quote_asset: "BNB".to_string(),
            init_price: "1".to_string(),
        };
        let tx = builder.account_number(1).sequence(0).create(&action).unwrap();
        assert_eq!(tx.chain_id, "Binance-Chain-Tigris");
        assert_eq!(tx.sign_doc.chain_id, "Binance-Chain-Tigris");
        assert_eq!(tx.memo, "");
    }
}
