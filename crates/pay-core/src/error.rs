//! # Payment Error Types
//!
//! Typed error handling for the checkout relay.
//! All relay and gateway operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Guidance returned to the browser when the provider rejects the merchant account.
pub const INVALID_MERCHANT_ACCOUNT_GUIDANCE: &str = "Invalid Merchant Account. Check ADYEN_MERCHANT_ACCOUNT in .env matches your Adyen Customer Area (Account → Merchant accounts).";

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Provider credentials (API key or merchant account) are absent
    #[error("Adyen not configured")]
    NotConfigured,

    /// Startup configuration errors (invalid environment, missing live prefix)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or incomplete client input
    #[error("{0}")]
    InvalidRequest(String),

    /// Provider rejected the configured merchant account
    #[error("{}", INVALID_MERCHANT_ACCOUNT_GUIDANCE)]
    InvalidMerchantAccount { message: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError {
        provider: String,
        error_code: Option<String>,
        message: String,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider returned a body that is not JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Returns true if the error came from talking to the provider
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidMerchantAccount { .. }
                | PaymentError::ProviderError { .. }
                | PaymentError::NetworkError(_)
                | PaymentError::Serialization(_)
        )
    }

    /// Text recorded in the API log.
    ///
    /// Same as `Display` except for a merchant-account rejection, where the
    /// provider's own message is kept instead of the guidance shown to the browser.
    pub fn log_detail(&self) -> String {
        match self {
            PaymentError::InvalidMerchantAccount { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Collapse a merchant-account rejection into a plain provider error.
    ///
    /// Only the payment-methods lookup reports the rejection with guidance;
    /// the payment submission paths report every upstream error as a bad gateway.
    pub fn into_upstream_failure(self) -> Self {
        match self {
            PaymentError::InvalidMerchantAccount { message } => PaymentError::ProviderError {
                provider: "adyen".to_string(),
                error_code: Some("901".to_string()),
                message,
            },
            other => other,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::NotConfigured => 503,
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::InvalidMerchantAccount { .. } => 400,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 502,
            PaymentError::Serialization(_) => 502,
            PaymentError::Internal(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::NotConfigured.status_code(), 503);
        assert_eq!(
            PaymentError::InvalidRequest("amount required".into()).status_code(),
            400
        );
        assert_eq!(
            PaymentError::InvalidMerchantAccount {
                message: "Invalid Merchant Account".into()
            }
            .status_code(),
            400
        );
        assert_eq!(PaymentError::NetworkError("timeout".into()).status_code(), 502);
    }

    #[test]
    fn test_messages() {
        assert_eq!(PaymentError::NotConfigured.to_string(), "Adyen not configured");
        assert_eq!(
            PaymentError::InvalidRequest("details or paymentData required".into()).to_string(),
            "details or paymentData required"
        );
        let err = PaymentError::InvalidMerchantAccount {
            message: "Invalid Merchant Account".into(),
        };
        assert!(err.to_string().contains("ADYEN_MERCHANT_ACCOUNT"));
    }

    #[test]
    fn test_into_upstream_failure() {
        let err = PaymentError::InvalidMerchantAccount {
            message: "Invalid Merchant Account".into(),
        }
        .into_upstream_failure();
        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("Invalid Merchant Account"));

        let err = PaymentError::NotConfigured.into_upstream_failure();
        assert!(matches!(err, PaymentError::NotConfigured));
    }

    #[test]
    fn test_log_detail_keeps_provider_message() {
        let err = PaymentError::InvalidMerchantAccount {
            message: "Invalid Merchant Account".into(),
        };
        assert_eq!(err.log_detail(), "Invalid Merchant Account");
        assert_eq!(
            PaymentError::NetworkError("reset".into()).log_detail(),
            "Network error: reset"
        );
    }

    #[test]
    fn test_is_upstream() {
        assert!(PaymentError::NetworkError("reset".into()).is_upstream());
        assert!(!PaymentError::NotConfigured.is_upstream());
        assert!(!PaymentError::InvalidRequest("x".into()).is_upstream());
    }
}
