//! # Adyen Configuration
//!
//! Configuration management for the Adyen integration.
//! All secrets are loaded from environment variables. Missing credentials are
//! not an error here: the API answers "not configured" instead of failing startup.

use pay_core::{PaymentError, PaymentResult};
use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Checkout API version used for all calls
pub const API_VERSION: &str = "v71";

const TEST_CHECKOUT_URL: &str = "https://checkout-test.adyen.com";

/// Adyen platform the credentials belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdyenEnvironment {
    #[default]
    Test,
    Live,
}

impl AdyenEnvironment {
    /// Value the Drop-in script expects for `environment`
    pub fn as_str(&self) -> &'static str {
        match self {
            AdyenEnvironment::Test => "test",
            AdyenEnvironment::Live => "live",
        }
    }
}

impl std::fmt::Display for AdyenEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown Adyen environment: {0} (expected \"test\" or \"live\")")]
pub struct UnknownEnvironment(pub String);

impl FromStr for AdyenEnvironment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" => Ok(AdyenEnvironment::Test),
            "live" => Ok(AdyenEnvironment::Live),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

/// Adyen API configuration
#[derive(Debug, Clone, Default)]
pub struct AdyenConfig {
    /// Server-side API key (sent as `X-API-Key`)
    pub api_key: String,

    /// Client key handed to the Drop-in script
    pub client_key: String,

    /// Merchant account all payments are booked to
    pub merchant_account: String,

    pub environment: AdyenEnvironment,

    /// Live endpoint prefix from the Customer Area (live only)
    pub live_url_prefix: Option<String>,

    /// Overrides the computed endpoint (for testing/mocking)
    pub api_base_url: Option<String>,
}

impl AdyenConfig {
    /// Load configuration from environment variables.
    ///
    /// Read env vars:
    /// - `ADYEN_API_KEY`
    /// - `ADYEN_CLIENT_KEY`
    /// - `ADYEN_MERCHANT_ACCOUNT`
    /// - `ADYEN_ENVIRONMENT` (`test` or `live`, default `test`)
    /// - `ADYEN_LIVE_URL_PREFIX` (required for `live`)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment = match env::var("ADYEN_ENVIRONMENT") {
            Ok(raw) => raw.parse::<AdyenEnvironment>().unwrap_or_else(|err| {
                warn!("{}, falling back to test", err);
                AdyenEnvironment::Test
            }),
            Err(_) => AdyenEnvironment::Test,
        };

        Self {
            api_key: env::var("ADYEN_API_KEY").unwrap_or_default(),
            client_key: env::var("ADYEN_CLIENT_KEY").unwrap_or_default(),
            merchant_account: env::var("ADYEN_MERCHANT_ACCOUNT").unwrap_or_default(),
            environment,
            live_url_prefix: env::var("ADYEN_LIVE_URL_PREFIX")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            api_base_url: None,
        }
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        api_key: impl Into<String>,
        client_key: impl Into<String>,
        merchant_account: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            client_key: client_key.into(),
            merchant_account: merchant_account.into(),
            ..Self::default()
        }
    }

    /// Both the API key and the merchant account are set
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.merchant_account.is_empty()
    }

    pub fn is_live(&self) -> bool {
        self.environment == AdyenEnvironment::Live
    }

    /// Versioned Checkout API endpoint, e.g. `https://checkout-test.adyen.com/v71`
    pub fn checkout_base_url(&self) -> PaymentResult<String> {
        let base = match (&self.api_base_url, self.environment) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, AdyenEnvironment::Test) => TEST_CHECKOUT_URL.to_string(),
            (None, AdyenEnvironment::Live) => {
                let prefix = self.live_url_prefix.as_deref().ok_or_else(|| {
                    PaymentError::Configuration(
                        "ADYEN_LIVE_URL_PREFIX must be set when ADYEN_ENVIRONMENT=live".to_string(),
                    )
                })?;
                format!("https://{}-checkout-live.adyenpayments.com/checkout", prefix)
            }
        };

        Ok(format!("{}/{}", base, API_VERSION))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Builder: set environment
    pub fn with_environment(mut self, environment: AdyenEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Log the loaded settings with keys masked
    pub fn log_summary(&self) {
        info!("Loaded Adyen settings:");
        for (name, value) in [("ADYEN_API_KEY", &self.api_key), ("ADYEN_CLIENT_KEY", &self.client_key)] {
            info!("  {}={} (len={})", name, mask_secret(value, 4), value.chars().count());
        }
        info!(
            "  ADYEN_MERCHANT_ACCOUNT={}",
            if self.merchant_account.is_empty() { "(empty)" } else { self.merchant_account.as_str() }
        );
        info!("  ADYEN_ENVIRONMENT={}", self.environment);
    }
}

/// Show only the first and last `show` characters of a secret.
///
/// Values too short to mask safely are fully hidden.
pub fn mask_secret(value: &str, show: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        "(empty)".to_string()
    } else if chars.len() > show * 2 {
        let head: String = chars[..show].iter().collect();
        let tail: String = chars[chars.len() - show..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}
