use crate::config::AppConfig;
use crate::{OrderError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::error::DisplayErrorContext;
use secrecy::SecretString;

/// Source of per-account API secrets
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Look up and decrypt the secret stored under the account's name
    async fn resolve(&self, account: &str) -> Result<SecretString>;
}

/// Secrets held as SecureString parameters in AWS Systems Manager Parameter Store,
/// one parameter per account, named after the account
#[derive(Clone)]
pub struct SsmSecretStore {
    client: aws_sdk_ssm::Client,
}

impl SsmSecretStore {
    /// Build a client for the configured region and credentials profile
    pub async fn from_config(config: &AppConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));

        if let Some(profile) = &config.aws_profile {
            tracing::debug!("Using AWS credentials profile {}", profile);
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_ssm::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn resolve(&self, account: &str) -> Result<SecretString> {
        tracing::debug!(account = %account, "Resolving account secret");

        let output = self
            .client
            .get_parameter()
            .name(account)
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_parameter_not_found());
                if not_found {
                    OrderError::SecretNotFound(account.to_string())
                } else {
                    OrderError::SecretStoreUnavailable(DisplayErrorContext(&err).to_string())
                }
            })?;

        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(|value| SecretString::from(value.to_string()))
            .ok_or_else(|| OrderError::SecretNotFound(account.to_string()))
    }
}
