use crate::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "ORDERBOT";

/// Runtime configuration, passed explicitly to every client constructor
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Region the parameter store lives in
    pub aws_region: String,
    /// Shared credentials profile (falls back to the default provider chain)
    pub aws_profile: Option<String>,
    pub live_api_host: String,
    pub sandbox_api_host: String,
    /// Upper bound for every exchange request
    pub http_timeout_secs: u64,
    /// How far below the ask a maker order is posted
    pub maker_undercut: Decimal,
    /// Share of the fiat amount left after exchange fees
    pub fee_ratio: Decimal,
    /// Surface a rejected order as an invocation error instead of only logging it
    pub strict_submission: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            aws_region: "us-west-2".to_string(),
            aws_profile: None,
            live_api_host: "https://api.gemini.com".to_string(),
            sandbox_api_host: "https://api.sandbox.gemini.com".to_string(),
            http_timeout_secs: 10,
            maker_undercut: dec!(0.20),
            fee_ratio: dec!(0.999),
            strict_submission: false,
        }
    }
}

impl AppConfig {
    /// Load defaults overridden by `ORDERBOT_*` variables and `AWS_PROFILE`
    pub fn load() -> Result<Self> {
        Self::load_from(
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
            std::env::var("AWS_PROFILE").ok(),
        )
    }

    /// Load from an explicit environment source
    pub fn load_from(env: config::Environment, aws_profile: Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("aws_region", defaults.aws_region)?
            .set_default("live_api_host", defaults.live_api_host)?
            .set_default("sandbox_api_host", defaults.sandbox_api_host)?
            .set_default("http_timeout_secs", defaults.http_timeout_secs)?
            .set_default("maker_undercut", defaults.maker_undercut.to_string())?
            .set_default("fee_ratio", defaults.fee_ratio.to_string())?
            .set_default("strict_submission", defaults.strict_submission)?
            .add_source(env)
            .set_override_option("aws_profile", aws_profile)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
