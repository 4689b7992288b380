//! # Adyen Checkout API
//!
//! Implementation of the server-side calls behind Adyen Drop-in
//! (Advanced flow): `/paymentMethods`, `/payments` and `/payments/details`.

use crate::config::AdyenConfig;
use async_trait::async_trait;
use pay_core::{CheckoutGateway, PaymentError, PaymentResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Adyen error code for a merchant account the API key may not use
pub const INVALID_MERCHANT_ACCOUNT_CODE: &str = "901";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Adyen Checkout API gateway
///
/// Sends each request once; retries are left to the shopper.
pub struct AdyenCheckoutGateway {
    config: AdyenConfig,
    base_url: String,
    client: Client,
}

impl AdyenCheckoutGateway {
    /// Create a new gateway; fails if the endpoint cannot be derived
    pub fn new(config: AdyenConfig) -> PaymentResult<Self> {
        if !config.is_configured() {
            return Err(PaymentError::NotConfigured);
        }

        let base_url = config.checkout_base_url()?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    async fn post(&self, path: &str, body: Value) -> PaymentResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("X-API-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Adyen API error: status={}, body={}", status, text);
            return Err(classify_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Adyen response: {}", e))
        })
    }
}

#[async_trait]
impl CheckoutGateway for AdyenCheckoutGateway {
    #[instrument(skip(self, request))]
    async fn payment_methods(&self, request: Value) -> PaymentResult<Value> {
        self.post("/paymentMethods", request).await
    }

    #[instrument(skip(self, request))]
    async fn payments(&self, request: Value) -> PaymentResult<Value> {
        self.post("/payments", request).await
    }

    #[instrument(skip(self, request))]
    async fn payments_details(&self, request: Value) -> PaymentResult<Value> {
        self.post("/payments/details", request).await
    }

    fn merchant_account(&self) -> &str {
        &self.config.merchant_account
    }

    fn provider_name(&self) -> &'static str {
        "adyen"
    }
}

// =============================================================================
// Adyen API Types
// =============================================================================

/// Error body documented for all Checkout API endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdyenErrorResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    psp_reference: Option<String>,
}

/// Map a non-2xx response to a local error kind by Adyen error code.
fn classify_error(status: u16, body: &str) -> PaymentError {
    let Ok(parsed) = serde_json::from_str::<AdyenErrorResponse>(body) else {
        return PaymentError::ProviderError {
            provider: "adyen".to_string(),
            error_code: None,
            message: format!("HTTP {}: {}", status, body),
        };
    };

    let message = parsed
        .message
        .unwrap_or_else(|| format!("HTTP {}", parsed.status.unwrap_or(status)));

    if parsed.error_code.as_deref() == Some(INVALID_MERCHANT_ACCOUNT_CODE) {
        return PaymentError::InvalidMerchantAccount { message };
    }

    let mut detail = message;
    if let Some(kind) = &parsed.error_type {
        detail = format!("{} ({})", detail, kind);
    }
    if let Some(psp) = &parsed.psp_reference {
        detail = format!("{} [pspReference={}]", detail, psp);
    }

    PaymentError::ProviderError {
        provider: "adyen".to_string(),
        error_code: parsed.error_code,
        message: detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gateway_for(server: &MockServer) -> AdyenCheckoutGateway {
        let config = AdyenConfig::new("AQE_test_key", "test_CLIENT", "ShopECOM")
            .with_api_base_url(server.uri());
        AdyenCheckoutGateway::new(config).unwrap()
    }

    #[test]
    fn test_unconfigured_gateway_is_refused() {
        let result = AdyenCheckoutGateway::new(AdyenConfig::new("", "", ""));
        assert!(matches!(result, Err(PaymentError::NotConfigured)));
    }

    #[test]
    fn test_classify_invalid_merchant_account() {
        let body = r#"{"status":403,"errorCode":"901","message":"Invalid Merchant Account","errorType":"security"}"#;
        match classify_error(403, body) {
            PaymentError::InvalidMerchantAccount { message } => {
                assert_eq!(message, "Invalid Merchant Account")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_classify_other_errors() {
        let body = r#"{"status":422,"errorCode":"14_030","message":"Return URL is missing.","errorType":"validation","pspReference":"ABC"}"#;
        match classify_error(422, body) {
            PaymentError::ProviderError {
                error_code,
                message,
                ..
            } => {
                assert_eq!(error_code.as_deref(), Some("14_030"));
                assert_eq!(message, "Return URL is missing. (validation) [pspReference=ABC]");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let err = classify_error(500, "<html>oops</html>");
        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_payment_methods_round_trip() {
        let server = MockServer::start().await;
        let request = json!({"merchantAccount": "ShopECOM", "countryCode": "NL"});
        Mock::given(method("POST"))
            .and(path("/v71/paymentMethods"))
            .and(header("X-API-Key", "AQE_test_key"))
            .and(body_json(&request))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"paymentMethods": [{"type": "scheme", "name": "Cards"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let response = gateway.payment_methods(request).await.unwrap();

        assert_eq!(response["paymentMethods"][0]["type"], "scheme");
    }

    #[tokio::test]
    async fn test_payments_details_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v71/payments/details"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultCode": "Authorised"})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let response = gateway
            .payments_details(json!({"details": {"redirectResult": "X"}}))
            .await
            .unwrap();

        assert_eq!(response["resultCode"], "Authorised");
    }

    #[tokio::test]
    async fn test_payments_merchant_error_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v71/payments"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "status": 403,
                "errorCode": "901",
                "message": "Invalid Merchant Account",
                "errorType": "security"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.payments(json!({"amount": {"value": 1}})).await.unwrap_err();

        assert!(matches!(err, PaymentError::InvalidMerchantAccount { .. }));
    }

    #[tokio::test]
    async fn test_non_json_success_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v71/payments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.payments(json!({})).await.unwrap_err();

        assert!(matches!(err, PaymentError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = AdyenConfig::new("k", "c", "m").with_api_base_url("http://127.0.0.1:1");
        let gateway = AdyenCheckoutGateway::new(config).unwrap();

        let err = gateway.payments(json!({})).await.unwrap_err();

        assert!(matches!(err, PaymentError::NetworkError(_)));
        assert_eq!(gateway.provider_name(), "adyen");
        assert_eq!(gateway.merchant_account(), "m");
    }
}
