use crate::secrets::SecretStore;
use crate::{OrderError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sha2::Sha384;
use std::sync::Arc;

type HmacSha384 = Hmac<Sha384>;

pub const API_KEY_HEADER: &str = "x-gemini-apikey";
pub const PAYLOAD_HEADER: &str = "x-gemini-payload";
pub const SIGNATURE_HEADER: &str = "x-gemini-signature";

/// Headers of an authenticated request. The order itself travels in
/// `payload`; the request body stays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub content_type: &'static str,
    pub content_length: &'static str,
    pub api_key: String,
    pub payload: String,
    pub signature: String,
    pub cache_control: &'static str,
}

impl SignedHeaders {
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static(self.content_length));
        headers.insert(HeaderName::from_static(API_KEY_HEADER), header_value(&self.api_key)?);
        headers.insert(HeaderName::from_static(PAYLOAD_HEADER), header_value(&self.payload)?);
        headers.insert(HeaderName::from_static(SIGNATURE_HEADER), header_value(&self.signature)?);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(self.cache_control));
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| OrderError::Signing(format!("invalid header value: {}", e)))
}

/// API key presented for an account
pub fn api_key_for(account: &str) -> String {
    format!("account-{}", account)
}

/// Base64 of the payload's compact JSON
pub fn encode_payload<T: Serialize>(payload: &T) -> Result<String> {
    let json = serde_json::to_string(payload)
        .map_err(|e| OrderError::Signing(format!("failed to serialize payload: {}", e)))?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Lowercase hex HMAC-SHA384 of `message` keyed by `secret`
pub fn signature(secret: &SecretString, message: &str) -> String {
    let mut mac = HmacSha384::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Signs payloads with the account's secret from a [`SecretStore`]
#[derive(Clone)]
pub struct RequestSigner {
    secrets: Arc<dyn SecretStore>,
}

impl RequestSigner {
    pub fn new(secrets: Arc<dyn SecretStore>) -> Self {
        Self { secrets }
    }

    /// Encode and sign `payload` on behalf of `account`.
    ///
    /// Secret store failures are returned unchanged.
    pub async fn sign<T: Serialize>(&self, account: &str, payload: &T) -> Result<SignedHeaders> {
        let encoded = encode_payload(payload)?;
        let secret = self.secrets.resolve(account).await?;

        Ok(SignedHeaders {
            content_type: "text/plain",
            content_length: "0",
            api_key: api_key_for(account),
            signature: signature(&secret, &encoded),
            payload: encoded,
            cache_control: "no-cache",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExchangeEnvironment, OrderPayload, OrderRequest, OrderType};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    const ENCODED: &str = "eyJyZXF1ZXN0IjoiL3YxL29yZGVyL25ldyIsIm5vbmNlIjoxNzAwMDAwMDAwMDAwLCJzeW1ib2wiOiJidGN1c2QiLCJhbW91bnQiOiIwLjAwMjAwMCIsInByaWNlIjoiNDk5OTkuODAiLCJzaWRlIjoiYnV5IiwidHlwZSI6ImV4Y2hhbmdlIGxpbWl0Iiwib3B0aW9ucyI6WyJtYWtlci1vci1jYW5jZWwiXX0=";
    const SIGNATURE: &str = "5e412796ca6404a2000df08c11406aa982d393dd22d074d773f86642165492c57eda6f300c8b49d20c4c416e87489b67";

    struct FixedSecret;

    #[async_trait]
    impl SecretStore for FixedSecret {
        async fn resolve(&self, _account: &str) -> Result<SecretString> {
            Ok(SecretString::from("test-secret".to_string()))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl SecretStore for Unreachable {
        async fn resolve(&self, _account: &str) -> Result<SecretString> {
            Err(OrderError::SecretStoreUnavailable("connection refused".to_string()))
        }
    }

    fn payload(nonce: i64) -> OrderPayload {
        let request = OrderRequest {
            account: "acct1".to_string(),
            environment: ExchangeEnvironment::Live,
            symbol: "btcusd".to_string(),
            fiat_amount: dec!(100),
            order_type: OrderType::Maker,
            include_fees: false,
        };
        OrderPayload::limit_buy(&request, "49999.80".to_string(), "0.002000".to_string(), nonce)
    }

    #[tokio::test]
    async fn test_sign_known_vector() {
        let signer = RequestSigner::new(Arc::new(FixedSecret));
        let headers = signer.sign("acct1", &payload(1_700_000_000_000)).await.unwrap();

        assert_eq!(headers.payload, ENCODED);
        assert_eq!(headers.signature, SIGNATURE);
        assert_eq!(headers.api_key, "account-acct1");
        assert_eq!(headers.content_type, "text/plain");
        assert_eq!(headers.content_length, "0");
        assert_eq!(headers.cache_control, "no-cache");
    }

    #[tokio::test]
    async fn test_signature_is_deterministic_and_payload_sensitive() {
        let signer = RequestSigner::new(Arc::new(FixedSecret));
        let first = signer.sign("acct1", &payload(1)).await.unwrap();
        let second = signer.sign("acct1", &payload(1)).await.unwrap();
        let other = signer.sign("acct1", &payload(2)).await.unwrap();

        assert_eq!(first.signature, second.signature);
        assert_ne!(first.signature, other.signature);
        assert_eq!(first.signature.len(), 96);
        assert!(first.signature.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[tokio::test]
    async fn test_secret_store_errors_propagate() {
        let signer = RequestSigner::new(Arc::new(Unreachable));
        let result = signer.sign("acct1", &payload(1)).await;
        assert!(matches!(result, Err(OrderError::SecretStoreUnavailable(_))));
    }

    #[test]
    fn test_header_map() {
        let headers = SignedHeaders {
            content_type: "text/plain",
            content_length: "0",
            api_key: "account-acct1".to_string(),
            payload: ENCODED.to_string(),
            signature: SIGNATURE.to_string(),
            cache_control: "no-cache",
        };

        let map = headers.to_header_map().unwrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map["X-GEMINI-APIKEY"], "account-acct1");
        assert_eq!(map["x-gemini-signature"], SIGNATURE);
        assert_eq!(map[CONTENT_LENGTH], "0");
    }

    #[test]
    fn test_unserializable_payload_is_signing_error() {
        // JSON object keys must be strings
        let payload = std::collections::HashMap::from([((1u8, 2u8), 3u8)]);
        assert!(matches!(encode_payload(&payload), Err(OrderError::Signing(_))));
    }

    #[test]
    fn test_invalid_header_value_is_signing_error() {
        let headers = SignedHeaders {
            content_type: "text/plain",
            content_length: "0",
            api_key: "account-bad\nname".to_string(),
            payload: ENCODED.to_string(),
            signature: SIGNATURE.to_string(),
            cache_control: "no-cache",
        };
        assert!(matches!(headers.to_header_map(), Err(OrderError::Signing(_))));
    }
}
