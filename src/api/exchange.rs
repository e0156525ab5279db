use crate::config::AppConfig;
use crate::models::{ExchangeEnvironment, OrderAck, TickerSnapshot, NEW_ORDER_PATH};
use crate::{OrderError, Result};
use reqwest::header::HeaderMap;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// REST client for the exchange's public ticker and order endpoints
#[derive(Clone)]
pub struct ExchangeClient {
    client: Client,
    live_host: String,
    sandbox_host: String,
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    ask: Option<String>,
}

impl ExchangeClient {
    pub fn new(live_host: &str, sandbox_host: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrderError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            live_host: live_host.trim_end_matches('/').to_string(),
            sandbox_host: sandbox_host.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.live_api_host,
            &config.sandbox_api_host,
            config.http_timeout(),
        )
    }

    pub fn host(&self, environment: ExchangeEnvironment) -> &str {
        match environment {
            ExchangeEnvironment::Live => &self.live_host,
            ExchangeEnvironment::Sandbox => &self.sandbox_host,
        }
    }

    /// Current ask for `symbol`
    /// Endpoint: GET /v2/ticker/{symbol}
    pub async fn ticker(&self, environment: ExchangeEnvironment, symbol: &str) -> Result<TickerSnapshot> {
        let url = format!("{}/v2/ticker/{}", self.host(environment), symbol);
        tracing::debug!("URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OrderError::MarketData(format!("ticker request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrderError::MarketData(format!("ticker API error: {}", status)));
        }

        let ticker: TickerResponse = response
            .json()
            .await
            .map_err(|e| OrderError::MarketData(format!("malformed ticker response: {}", e)))?;
        tracing::debug!("Response: {:?}", ticker);

        let ask = ticker
            .ask
            .ok_or_else(|| OrderError::MarketData(format!("ticker for {} has no ask", symbol)))?;
        let ask = Decimal::from_str(ask.trim())
            .map_err(|e| OrderError::MarketData(format!("unparsable ask {:?}: {}", ask, e)))?;

        Ok(TickerSnapshot { ask })
    }

    /// Place an order described entirely by its signed headers. The body is empty.
    /// Any 2xx answer means the order was placed, even if the body is not an ack.
    /// Endpoint: POST /v1/order/new
    pub async fn new_order(&self, environment: ExchangeEnvironment, headers: HeaderMap) -> Result<OrderAck> {
        let url = format!("{}{}", self.host(environment), NEW_ORDER_PATH);

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| OrderError::OrderSubmission {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read order response: {}", e);
            String::new()
        });

        if !status.is_success() {
            return Err(OrderError::OrderSubmission {
                status: Some(status.as_u16()),
                message: format!("{}: {}", status, body),
            });
        }

        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::warn!("Unrecognized order response ({}): {}", e, body);
            OrderAck::unparsed(body)
        }))
    }
}
