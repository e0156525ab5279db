use rust_decimal::Decimal;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, OrderError>;

/// Every way placing an order can fail.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A required invocation field was absent or empty.
    #[error("{0} not specified")]
    MissingField(&'static str),

    /// Fiat amount was negative.
    #[error("Invalid fiat amount: {0}")]
    InvalidAmount(Decimal),

    /// No parameter with the account's name exists in the secret store.
    #[error("No secret stored for account {0}")]
    SecretNotFound(String),

    /// The secret store could not be reached or refused the lookup.
    #[error("Secret store unavailable: {0}")]
    SecretStoreUnavailable(String),

    /// Ticker could not be fetched or did not carry a usable ask.
    #[error("Market data error: {0}")]
    MarketData(String),

    /// Computed or quoted price is not strictly positive.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// The payload or its headers could not be encoded.
    #[error("Signing error: {0}")]
    Signing(String),

    /// The exchange refused the order or could not be reached.
    #[error("Order submission failed: {message}")]
    OrderSubmission {
        /// HTTP status, when the exchange answered at all.
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
