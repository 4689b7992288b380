//! # pay-adyen
//!
//! Adyen Checkout gateway for dropin-checkout-rs.
//!
//! The browser collects card data in Adyen's Drop-in widget, which encrypts it
//! client-side. This crate makes the server-side half of that flow:
//!
//! 1. `POST /paymentMethods` - which methods to show for an amount and country
//! 2. `POST /payments` - submit the encrypted payment method
//! 3. `POST /payments/details` - finish after a redirect or 3-D Secure challenge
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_adyen::{AdyenCheckoutGateway, AdyenConfig};
//! use pay_core::CheckoutGateway;
//!
//! let config = AdyenConfig::from_env();
//! if config.is_configured() {
//!     let gateway = AdyenCheckoutGateway::new(config)?;
//!     let methods = gateway.payment_methods(request).await?;
//! }
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::{AdyenCheckoutGateway, INVALID_MERCHANT_ACCOUNT_CODE};
pub use config::{mask_secret, AdyenConfig, AdyenEnvironment, API_VERSION};
