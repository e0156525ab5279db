use crate::api::ExchangeClient;
use crate::config::AppConfig;
use crate::models::{OrderAck, OrderPayload, OrderRequest};
use crate::pricing::PriceCalculator;
use crate::secrets::{SecretStore, SsmSecretStore};
use crate::signing::RequestSigner;
use crate::{OrderError, Result};
use chrono::Utc;
use std::sync::Arc;

/// Result of the submission step. A rejected order does not abort the
/// invocation; it is reported here instead.
#[derive(Debug)]
pub enum OrderOutcome {
    Accepted(OrderAck),
    Rejected(OrderError),
}

impl OrderOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Turn a rejection back into an error
    pub fn into_result(self) -> Result<OrderAck> {
        match self {
            Self::Accepted(ack) => Ok(ack),
            Self::Rejected(err) => Err(err),
        }
    }
}

/// Produces the nonce of each signed payload
pub type NonceSource = fn() -> i64;

fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Places a single limit buy: ticker -> price/amount -> sign -> submit
#[derive(Clone)]
pub struct OrderSubmitter {
    exchange: ExchangeClient,
    signer: RequestSigner,
    calculator: PriceCalculator,
    nonce: NonceSource,
}

impl OrderSubmitter {
    pub fn new(exchange: ExchangeClient, signer: RequestSigner, calculator: PriceCalculator) -> Self {
        Self {
            exchange,
            signer,
            calculator,
            nonce: epoch_millis,
        }
    }

    /// Wire up the exchange client and Parameter Store secrets from configuration
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let secrets: Arc<dyn SecretStore> = Arc::new(SsmSecretStore::from_config(config).await);
        Self::with_secret_store(config, secrets)
    }

    pub fn with_secret_store(config: &AppConfig, secrets: Arc<dyn SecretStore>) -> Result<Self> {
        Ok(Self::new(
            ExchangeClient::from_config(config)?,
            RequestSigner::new(secrets),
            PriceCalculator::from_config(config),
        ))
    }

    /// Replace the wall-clock nonce
    pub fn with_nonce_source(mut self, nonce: NonceSource) -> Self {
        self.nonce = nonce;
        self
    }

    /// Submit one order for `request`.
    ///
    /// Market data, pricing, signing and secret failures abort with `Err`
    /// before anything is sent. A failed submission is logged and returned as
    /// [`OrderOutcome::Rejected`].
    pub async fn submit(&self, request: &OrderRequest) -> Result<OrderOutcome> {
        tracing::info!("Retrieving current pricing data");
        let ticker = self.exchange.ticker(request.environment, &request.symbol).await?;
        tracing::info!("Got current pricing data");
        tracing::info!("Asking price: {}", ticker.ask);
        tracing::info!(
            "Fee adjustment ratio: {}",
            self.calculator.fee_ratio(request.include_fees)
        );

        let quote = self.calculator.quote(
            ticker.ask,
            request.fiat_amount,
            request.order_type.is_maker(),
            request.include_fees,
        )?;
        tracing::info!("Adjusted price: {}", quote.price);
        tracing::info!("Amount: {}", quote.amount);

        let payload = OrderPayload::limit_buy(
            request,
            quote.price_string(),
            quote.amount_string(),
            (self.nonce)(),
        );
        let headers = self
            .signer
            .sign(&request.account, &payload)
            .await?
            .to_header_map()?;

        match self.exchange.new_order(request.environment, headers).await {
            Ok(ack) => {
                tracing::info!(
                    account = %request.account,
                    symbol = %request.symbol,
                    order_id = ?ack.order_id,
                    "Order accepted: {:?}",
                    ack
                );
                Ok(OrderOutcome::Accepted(ack))
            }
            Err(e) => {
                tracing::error!(
                    account = %request.account,
                    symbol = %request.symbol,
                    "Order submission failed: {}",
                    e
                );
                Ok(OrderOutcome::Rejected(e))
            }
        }
    }
}
