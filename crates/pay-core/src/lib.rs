//! # pay-core
//!
//! Core types for the dropin-checkout demo shop.
//!
//! This crate provides:
//! - `CheckoutGateway` trait for the payment provider's server API
//! - `PaymentRelay`, the validate → default → call → log pipeline behind the JSON API
//! - `ApiLogStore`, the bounded log of provider calls
//! - `sanitize` for redacting card fields before they are logged
//! - `Cart` and `CartItem` for the fixed demo cart
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{ApiLogStore, PaymentRelay};
//!
//! let logs = ApiLogStore::new();
//! let relay = PaymentRelay::new(Some(gateway), logs.clone());
//!
//! let response = relay.payments(payload, &urls.return_url()).await?;
//! assert_eq!(logs.len(), 1);
//! ```

pub mod api_log;
pub mod cart;
pub mod error;
pub mod gateway;
pub mod redact;
pub mod relay;

// Re-exports for convenience
pub use api_log::{ApiLogEntry, ApiLogStore, DEFAULT_CAPACITY};
pub use cart::{Cart, CartItem, Currency, Price};
pub use error::{PaymentError, PaymentResult, INVALID_MERCHANT_ACCOUNT_GUIDANCE};
pub use gateway::{BoxedCheckoutGateway, CheckoutGateway, CheckoutUrls};
pub use redact::{is_sensitive_key, sanitize, REDACTED, SENSITIVE_KEYS};
pub use relay::{AmountInput, PaymentMethodsRequest, PaymentRelay};
