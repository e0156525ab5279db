use crate::config::AppConfig;
use crate::execution::{OrderOutcome, OrderSubmitter};
use crate::models::{ExchangeEnvironment, OrderRequest, OrderType};
use crate::{OrderError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Raw invocation input as delivered by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub fiat_amount: Option<Decimal>,
    /// "maker" or "taker" (default), case-insensitive
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub sandbox: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub include_fees: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl InvocationEvent {
    /// Validate required fields and normalize optional ones.
    /// Empty strings and a zero amount count as missing.
    pub fn into_request(self) -> Result<OrderRequest> {
        let account = non_empty(self.account).ok_or(OrderError::MissingField("Account"))?;
        let symbol = non_empty(self.symbol).ok_or(OrderError::MissingField("Symbol"))?;
        let fiat_amount = self
            .fiat_amount
            .filter(|amount| !amount.is_zero())
            .ok_or(OrderError::MissingField("Fiat amount"))?;
        if fiat_amount.is_sign_negative() {
            return Err(OrderError::InvalidAmount(fiat_amount));
        }

        let order_type = self
            .order_type
            .as_deref()
            .map(OrderType::from_label)
            .unwrap_or_default();

        Ok(OrderRequest {
            account,
            environment: ExchangeEnvironment::from_sandbox_flag(self.sandbox),
            symbol,
            fiat_amount,
            order_type,
            include_fees: self.include_fees,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Entry point shared by the local and serverless runners
#[derive(Clone)]
pub struct InvocationHandler {
    submitter: OrderSubmitter,
    strict_submission: bool,
}

impl InvocationHandler {
    pub fn new(submitter: OrderSubmitter, strict_submission: bool) -> Self {
        Self {
            submitter,
            strict_submission,
        }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            OrderSubmitter::from_config(config).await?,
            config.strict_submission,
        ))
    }

    /// Run one invocation. Returns the log stream name when the caller
    /// supplied an execution context.
    ///
    /// A rejected order only fails the invocation in strict mode.
    pub async fn handle(&self, event: InvocationEvent, log_stream: Option<&str>) -> Result<Option<String>> {
        let request = event.into_request()?;

        tracing::info!(
            "New {} order for ${} worth of {}",
            request.order_type.as_str(),
            request.fiat_amount,
            request.base_currency()
        );

        let outcome = self.submitter.submit(&request).await?;
        if self.strict_submission {
            if let OrderOutcome::Rejected(err) = outcome {
                return Err(err);
            }
        }

        Ok(log_stream.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn complete() -> InvocationEvent {
        InvocationEvent {
            account: Some("acct1".to_string()),
            symbol: Some("btcusd".to_string()),
            fiat_amount: Some(dec!(100)),
            order_type: Some("Maker".to_string()),
            sandbox: true,
            include_fees: false,
        }
    }

    #[test]
    fn test_complete_event_becomes_request() {
        let request = complete().into_request().unwrap();

        assert_eq!(request.account, "acct1");
        assert_eq!(request.symbol, "btcusd");
        assert_eq!(request.fiat_amount, dec!(100));
        assert_eq!(request.order_type, OrderType::Maker);
        assert_eq!(request.environment, ExchangeEnvironment::Sandbox);
        assert!(!request.include_fees);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let event: InvocationEvent =
            serde_json::from_str(r#"{"account":"acct1","symbol":"ethusd","fiatAmount":25}"#).unwrap();
        let request = event.into_request().unwrap();

        assert_eq!(request.order_type, OrderType::Taker);
        assert_eq!(request.environment, ExchangeEnvironment::Live);
        assert!(!request.include_fees);
    }

    #[test]
    fn test_fiat_amount_accepts_strings() {
        let event: InvocationEvent = serde_json::from_str(
            r#"{"account":"acct1","symbol":"btcusd","fiatAmount":"12.50","orderType":"MAKER","sandbox":true,"includeFees":true}"#,
        )
        .unwrap();
        let request = event.into_request().unwrap();

        assert_eq!(request.fiat_amount, dec!(12.50));
        assert_eq!(request.order_type, OrderType::Maker);
        assert!(request.include_fees);
    }

    #[test]
    fn test_null_flags_are_false() {
        let event: InvocationEvent = serde_json::from_str(
            r#"{"account":"acct1","symbol":"btcusd","fiatAmount":10,"sandbox":null,"includeFees":null}"#,
        )
        .unwrap();
        let request = event.into_request().unwrap();

        assert_eq!(request.environment, ExchangeEnvironment::Live);
        assert!(!request.include_fees);
    }

    #[test]
    fn test_each_required_field_is_checked() {
        let missing_account = InvocationEvent { account: None, ..complete() };
        let empty_symbol = InvocationEvent { symbol: Some(String::new()), ..complete() };
        let missing_amount = InvocationEvent { fiat_amount: None, ..complete() };
        let zero_amount = InvocationEvent { fiat_amount: Some(Decimal::ZERO), ..complete() };

        assert!(matches!(missing_account.into_request(), Err(OrderError::MissingField("Account"))));
        assert!(matches!(empty_symbol.into_request(), Err(OrderError::MissingField("Symbol"))));
        assert!(matches!(missing_amount.into_request(), Err(OrderError::MissingField("Fiat amount"))));
        assert!(matches!(zero_amount.into_request(), Err(OrderError::MissingField("Fiat amount"))));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let event = InvocationEvent { fiat_amount: Some(dec!(-5)), ..complete() };
        let err = event.into_request().unwrap_err();

        assert!(matches!(err, OrderError::InvalidAmount(_)));
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(OrderError::MissingField("Account").to_string(), "Account not specified");
    }
}
