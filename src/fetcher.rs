use std::str::FromStr;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{header, Client, Proxy};
use serde::Serialize;
use serde_json::Value;

use crate::balance::{BalanceResult, Xrp};
use crate::config::Config;

/// Placeholder message when the endpoint answers without account data or an error message.
pub const DEFAULT_ZERO_MESSAGE: &str = "0";

#[async_trait]
pub trait BalanceFetcher: Send + Sync {
    /// Never fails: every error is folded into the returned result.
    async fn fetch(&self, address: &str) -> BalanceResult;
}

#[derive(Clone, Debug, Serialize)]
pub struct AccountInfoRequest<'a> {
    method: &'static str,
    params: [AccountInfoParams<'a>; 1],
}

#[derive(Clone, Debug, Serialize)]
struct AccountInfoParams<'a> {
    account: &'a str,
    strict: bool,
    ledger_index: &'static str,
    queue: bool,
}

impl<'a> AccountInfoRequest<'a> {
    pub fn new(account: &'a str) -> Self {
        Self {
            method: "account_info",
            params: [AccountInfoParams {
                account,
                strict: true,
                ledger_index: "current",
                queue: true,
            }],
        }
    }
}

/// `account_info` client for a rippled JSON-RPC endpoint.
pub struct RippledFetcher {
    // a client that could not be built turns every fetch into a failure
    client: Result<Client, String>,
    endpoint: String,
}

impl RippledFetcher {
    pub fn new(config: &Config) -> Self {
        let client = build_client(config).map_err(|err| {
            tracing::error!("{:#}", err);
            format!("{:#}", err)
        });

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    async fn account_info(&self, address: &str) -> anyhow::Result<Value> {
        let client = self.client.as_ref().map_err(|err| anyhow!("{}", err))?;
        let response = client
            .post(&self.endpoint)
            .json(&AccountInfoRequest::new(address))
            .send()
            .await
            .context("Failed to send account_info request")?;

        // status is not checked, error bodies go through the same parsing
        response
            .json()
            .await
            .context("Expect the endpoint to return a json body")
    }
}

#[async_trait]
impl BalanceFetcher for RippledFetcher {
    async fn fetch(&self, address: &str) -> BalanceResult {
        match self.account_info(address).await {
            Ok(body) => parse_account_info(&body),
            Err(err) => BalanceResult::failure(format!("{:#}", err)),
        }
    }
}

fn build_client(config: &Config) -> anyhow::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.append(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout());
    // only the configured proxy is used, never the environment's
    builder = match &config.proxy {
        Some(proxy) => builder.proxy(
            Proxy::all(proxy.as_str())
                .with_context(|| format!("Invalid proxy url {:?}", proxy))?,
        ),
        None => builder.no_proxy(),
    };
    builder.build().context("Failed to build HTTP Client")
}

/// Maps an `account_info` reply to a balance result.
///
/// Without account data, the error message is looked up at the top level, then under
/// `result` where rippled nests it, then in a top-level `Zero` field. Reading the nested
/// message is intentional: an unfunded account reports `Account not found.` instead of
/// the bare `"0"` placeholder.
pub fn parse_account_info(body: &Value) -> BalanceResult {
    if !body.is_object() {
        return BalanceResult::failure(format!("unexpected response {}", body));
    }

    let result = body.get("result");
    if let Some(account_data) = result.and_then(|result| result.get("account_data")) {
        return match parse_balance(account_data) {
            Ok(amount) => BalanceResult::Amount(amount),
            Err(err) => BalanceResult::failure(err),
        };
    }

    let message = body
        .get("error_message")
        .or_else(|| result.and_then(|result| result.get("error_message")))
        .or_else(|| body.get("Zero"))
        .map(message_text)
        .unwrap_or_else(|| DEFAULT_ZERO_MESSAGE.to_string());
    BalanceResult::ZeroOrError(message)
}

fn parse_balance(account_data: &Value) -> anyhow::Result<Xrp> {
    match account_data.get("Balance") {
        Some(Value::String(drops)) => Xrp::from_str(drops),
        Some(Value::Number(drops)) => drops
            .as_u64()
            .map(Xrp::from_drops)
            .ok_or_else(|| anyhow!("invalid drops value {}", drops)),
        Some(other) => Err(anyhow!("invalid drops value {}", other)),
        None => Err(anyhow!("account data has no Balance field")),
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
