//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment relay (and its API log), the demo cart, templates and configuration.

use crate::pages::{load_templates, Templates};
use anyhow::Context;
use axum::http::{header, HeaderMap};
use pay_adyen::{AdyenCheckoutGateway, AdyenConfig};
use pay_core::{ApiLogStore, BoxedCheckoutGateway, Cart, CheckoutUrls, PaymentRelay};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::warn;

const DEV_SECRET_KEY: &str = "dev-secret-change-in-production";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the Adyen return URL; derived from the request when unset
    pub base_url: Option<String>,
    /// Session signing secret
    pub secret_key: String,
    /// Development mode (verbose logs, route hints)
    pub debug: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5001),
            base_url: std::env::var("BASE_URL").ok().filter(|u| !u.trim().is_empty()),
            secret_key: std::env::var("SECRET_KEY").unwrap_or_else(|_| DEV_SECRET_KEY.to_string()),
            debug: std::env::var("DEBUG").map(|v| v == "1").unwrap_or(true),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// True when SECRET_KEY was not provided
    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }

    fn local_base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            base_url: None,
            secret_key: DEV_SECRET_KEY.to_string(),
            debug: true,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment relay (owns the API log)
    pub relay: PaymentRelay,
    /// Demo cart shown at checkout
    pub cart: Arc<Cart>,
    /// Client key and environment for the Drop-in script
    pub adyen: AdyenConfig,
    /// Page templates
    pub templates: Templates,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from environment: Adyen settings, optional cart file
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let adyen = AdyenConfig::from_env();
        adyen.log_summary();

        let gateway = if adyen.is_configured() {
            let gateway = AdyenCheckoutGateway::new(adyen.clone())
                .map_err(|e| anyhow::anyhow!("Failed to initialize Adyen: {}", e))?;
            Some(Arc::new(gateway) as BoxedCheckoutGateway)
        } else {
            warn!("ADYEN_API_KEY or ADYEN_MERCHANT_ACCOUNT missing; payment endpoints will answer 503");
            None
        };

        let cart = load_cart()?;

        Self::from_parts(config, adyen, gateway, cart)
    }

    /// Assemble state from explicit parts (used by tests)
    pub fn from_parts(
        config: AppConfig,
        adyen: AdyenConfig,
        gateway: Option<BoxedCheckoutGateway>,
        cart: Cart,
    ) -> anyhow::Result<Self> {
        let templates = load_templates().context("Failed to load page templates")?;

        Ok(Self {
            relay: PaymentRelay::new(gateway, ApiLogStore::new()),
            cart: Arc::new(cart),
            adyen,
            templates,
            config,
        })
    }

    pub fn logs(&self) -> &ApiLogStore {
        self.relay.logs()
    }

    /// Checkout URLs for this request.
    ///
    /// `BASE_URL` wins; otherwise the Host header (and `X-Forwarded-Proto`) of
    /// the incoming request, so the return URL points back at whoever served the page.
    pub fn checkout_urls(&self, headers: &HeaderMap) -> CheckoutUrls {
        if let Some(base) = &self.config.base_url {
            return CheckoutUrls::new(base.as_str());
        }

        let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
        match host {
            Some(host) => {
                let scheme = headers
                    .get("x-forwarded-proto")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("http");
                CheckoutUrls::new(format!("{}://{}", scheme, host))
            }
            None => CheckoutUrls::new(self.config.local_base_url()),
        }
    }
}

/// Load the cart from config file, falling back to the built-in demo cart
fn load_cart() -> anyhow::Result<Cart> {
    let config_paths = [
        "config/cart.toml",
        "../config/cart.toml",
        "../../config/cart.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let cart = Cart::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} cart items from {}", cart.items.len(), path);
            return Ok(cart);
        }
    }

    Ok(Cart::demo())
}
