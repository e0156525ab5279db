// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod execution;
pub mod handler;
pub mod models;
pub mod pricing;
pub mod secrets;
pub mod signing;

// Re-export commonly used types
pub use api::ExchangeClient;
pub use crate::config::AppConfig;
pub use error::{OrderError, Result};
pub use execution::{OrderOutcome, OrderSubmitter};
pub use handler::{InvocationEvent, InvocationHandler};
pub use models::*;
pub use secrets::{SecretStore, SsmSecretStore};
