//! # Checkout Gateway Trait
//!
//! Seam between the relay and the payment provider's server API.
//! The relay builds and logs requests; a gateway only moves JSON over the wire.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │           CheckoutGateway (trait)            │
//! │  ├── payment_methods()                       │
//! │  ├── payments()                              │
//! │  ├── payments_details()                      │
//! │  └── merchant_account()                      │
//! └──────────────────────────────────────────────┘
//!                        ▲
//!              ┌─────────┴─────────┐
//!              │ AdyenCheckout     │
//!              │   Gateway         │
//!              └───────────────────┘
//! ```

use crate::error::PaymentResult;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Server-side calls a Drop-in integration needs.
///
/// Each method sends the body as-is and returns the provider's raw JSON
/// response. Provider error bodies are mapped to [`crate::PaymentError`].
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// List the payment methods available for an amount and country.
    async fn payment_methods(&self, request: Value) -> PaymentResult<Value>;

    /// Start a payment with the encrypted payment method from the browser.
    async fn payments(&self, request: Value) -> PaymentResult<Value>;

    /// Complete a payment after a redirect or 3-D Secure challenge.
    async fn payments_details(&self, request: Value) -> PaymentResult<Value>;

    /// Merchant account requests are made on behalf of.
    fn merchant_account(&self) -> &str;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedCheckoutGateway = Arc<dyn CheckoutGateway>;

/// URLs of this service's own checkout pages
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the application (e.g., "http://localhost:5001")
    pub base_url: String,
    /// Where the provider sends the shopper back after a redirect
    pub return_path: String,
    pub success_path: String,
    pub failed_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            return_path: "/checkout/return".to_string(),
            success_path: "/checkout/success".to_string(),
            failed_path: "/checkout/failed".to_string(),
        }
    }

    pub fn return_url(&self) -> String {
        format!("{}{}", self.base_url, self.return_path)
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn failed_url(&self) -> String {
        format!("{}{}", self.base_url, self.failed_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:5001")
    }
}
