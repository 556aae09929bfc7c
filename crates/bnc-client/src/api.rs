//! HTTP client for the public Binance Chain API
//!
//! Read endpoints used for convenience (account, balances, markets) degrade
//! to empty results when the node cannot be reached. Broadcast never does.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use bnc_types::ValidationError;

use crate::{ClientError, Result};

/// Default page size of market listings
pub const DEFAULT_MARKET_LIMIT: u32 = 1000;

/// Result of broadcasting one transaction
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BroadcastResult {
    #[serde(default)]
    pub code: i64,
    pub hash: String,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub ok: bool,
}

/// Balance of one asset
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub symbol: String,
    pub free: String,
    #[serde(default)]
    pub locked: String,
    #[serde(default)]
    pub frozen: String,
}

/// Account state as reported by the API
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_number: u64,
    pub address: String,
    #[serde(default)]
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub public_key: Vec<u8>,
    pub sequence: u64,
}

/// A trading pair
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Market {
    pub base_asset_symbol: String,
    pub quote_asset_symbol: String,
    pub list_price: String,
    pub tick_size: String,
    pub lot_size: String,
}

/// Node information
#[derive(Deserialize, Debug, Clone)]
pub struct NodeInfo {
    pub id: String,
    pub moniker: String,
    pub network: String,
    pub version: String,
}

/// Sync information
#[derive(Deserialize, Debug, Clone)]
pub struct SyncInfo {
    pub latest_block_height: u64,
    pub latest_block_time: String,
    pub catching_up: bool,
}

/// Response of the node-info endpoint
#[derive(Deserialize, Debug, Clone)]
pub struct NodeStatus {
    pub node_info: NodeInfo,
    pub sync_info: SyncInfo,
}

/// Error body returned by the API
#[derive(Deserialize)]
struct ApiErrorBody {
    code: i64,
    message: String,
}

/// Client for the public HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http_client: HttpClient,
}

impl ApiClient {
    /// Create a client for `base_url`, e.g. `https://testnet-dex.binance.org`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Map a non-success response onto [`ClientError::Api`]
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await?;
        Err(match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => ClientError::Api {
                code: err.code,
                message: err.message,
            },
            Err(_) => ClientError::Api {
                code: i64::from(status.as_u16()),
                message: body,
            },
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = Self::check(self.http_client.get(url).send().await?).await?;
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    /// Broadcast a signed transaction given as hex. With `sync` the node
    /// waits for the check result before answering.
    pub async fn broadcast_tx(&self, tx_hex: &str, sync: bool) -> Result<Vec<BroadcastResult>> {
        let mut url = self.endpoint("/api/v1/broadcast")?;
        url.query_pairs_mut()
            .append_pair("sync", if sync { "true" } else { "false" });

        debug!(%url, tx_len = tx_hex.len() / 2, "broadcasting transaction");
        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "text/plain")
            .body(tx_hex.to_string())
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    /// Fetch account state; `None` when the API cannot be reached or does
    /// not know the account
    pub async fn get_account(&self, address: &str) -> Result<Option<Account>> {
        if address.is_empty() {
            return Err(ValidationError::new("address", "must not be empty").into());
        }
        let url = self.endpoint(&format!("/api/v1/account/{address}"))?;
        match self.get_json(url).await {
            Ok(account) => Ok(Some(account)),
            Err(e) => {
                warn!(address, error = %e, "account lookup failed");
                Ok(None)
            }
        }
    }

    /// Balances of `address`, empty when the account cannot be fetched
    pub async fn get_balance(&self, address: &str) -> Result<Vec<Balance>> {
        Ok(self
            .get_account(address)
            .await?
            .map(|account| account.balances)
            .unwrap_or_default())
    }

    /// List trading pairs, empty when the API cannot be reached
    pub async fn get_markets(&self, limit: u32, offset: u32) -> Result<Vec<Market>> {
        let mut url = self.endpoint("/api/v1/markets")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        match self.get_json(url).await {
            Ok(markets) => Ok(markets),
            Err(e) => {
                warn!(error = %e, "market listing failed");
                Ok(Vec::new())
            }
        }
    }

    /// Node information and sync status
    pub async fn node_info(&self) -> Result<NodeStatus> {
        let url = self.endpoint("/api/v1/node-info")?;
        self.get_json(url).await
    }
}
