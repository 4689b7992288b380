//! # Payment Relay
//!
//! Server-side half of the Drop-in flow. Each operation validates the browser's
//! JSON, fills the fields only the server may set, forwards the call through a
//! [`CheckoutGateway`] and records the exchange in the [`ApiLogStore`].
//!
//! Validation and configuration failures return before any provider call and
//! leave no log entry. Every provider call leaves exactly one entry, success or not.

use crate::api_log::ApiLogStore;
use crate::error::{PaymentError, PaymentResult};
use crate::gateway::BoxedCheckoutGateway;
use serde::{de, Deserialize, Deserializer};
use serde_json::{json, Map, Value};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub const PAYMENT_METHODS_ENDPOINT: &str = "POST /paymentMethods";
pub const PAYMENTS_ENDPOINT: &str = "POST /payments";
pub const PAYMENTS_DETAILS_ENDPOINT: &str = "POST /payments/details";

const DEFAULT_CURRENCY: &str = "EUR";
const DEFAULT_COUNTRY_CODE: &str = "NL";
const DEFAULT_CHANNEL: &str = "Web";

/// Body of `POST /api/adyen/paymentMethods`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsRequest {
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub browser_info: Option<Value>,
}

/// Amount as the browser sends it; both fields optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmountInput {
    /// Minor units; integral numbers and numeric strings are accepted
    #[serde(default, deserialize_with = "minor_units")]
    pub value: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl PaymentMethodsRequest {
    /// Parse a request body; `null` reads as an empty object.
    pub fn from_body(body: Value) -> PaymentResult<Self> {
        if body.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(body)
            .map_err(|e| PaymentError::InvalidRequest(format!("invalid paymentMethods request: {}", e)))
    }

    /// Provider request with server defaults applied
    fn into_provider_request(self, merchant_account: &str) -> Value {
        let amount = self.amount.unwrap_or_default();

        let mut request = json!({
            "merchantAccount": merchant_account,
            "amount": {
                "value": amount.value.unwrap_or(0),
                "currency": amount.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
            "countryCode": self.country_code.unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
            "channel": self.channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
        });

        if let Some(browser_info) = self.browser_info.filter(is_truthy) {
            request["browserInfo"] = browser_info;
        }

        request
    }
}

/// Relays Drop-in calls to the provider and keeps the API log
#[derive(Clone)]
pub struct PaymentRelay {
    gateway: Option<BoxedCheckoutGateway>,
    logs: ApiLogStore,
}

impl PaymentRelay {
    /// `gateway` is `None` when provider credentials are not configured.
    pub fn new(gateway: Option<BoxedCheckoutGateway>, logs: ApiLogStore) -> Self {
        Self { gateway, logs }
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn logs(&self) -> &ApiLogStore {
        &self.logs
    }

    fn gateway(&self) -> PaymentResult<&BoxedCheckoutGateway> {
        self.gateway.as_ref().ok_or(PaymentError::NotConfigured)
    }

    /// Fetch the payment methods to offer for this amount and country.
    ///
    /// A rejected merchant account is reported as
    /// [`PaymentError::InvalidMerchantAccount`]; other failures as upstream errors.
    #[instrument(skip(self, body))]
    pub async fn payment_methods(&self, body: Value) -> PaymentResult<Value> {
        let gateway = self.gateway()?;
        let request = PaymentMethodsRequest::from_body(body)?;
        let params = request.into_provider_request(gateway.merchant_account());

        let outcome = gateway.payment_methods(params.clone()).await;
        self.record(PAYMENT_METHODS_ENDPOINT, &params, outcome)
    }

    /// Submit the Drop-in payment payload.
    ///
    /// The payload is forwarded in full. `reference`, `returnUrl`,
    /// `merchantAccount` and `channel` are filled in when absent.
    /// A `null` body reads as an empty object.
    #[instrument(skip(self, payload))]
    pub async fn payments(&self, payload: Value, return_url: &str) -> PaymentResult<Value> {
        let gateway = self.gateway()?;

        let mut request = match payload {
            Value::Object(request) => request,
            Value::Null => Map::new(),
            _ => {
                return Err(PaymentError::InvalidRequest(
                    "request body must be a JSON object".to_string(),
                ))
            }
        };

        if !has_amount(&request) {
            return Err(PaymentError::InvalidRequest("amount required".to_string()));
        }

        request
            .entry("reference")
            .or_insert_with(|| Value::String(generate_reference()));
        request
            .entry("returnUrl")
            .or_insert_with(|| Value::String(return_url.to_string()));
        request
            .entry("merchantAccount")
            .or_insert_with(|| Value::String(gateway.merchant_account().to_string()));
        request
            .entry("channel")
            .or_insert_with(|| Value::String(DEFAULT_CHANNEL.to_string()));

        let request = Value::Object(request);
        let outcome = gateway
            .payments(request.clone())
            .await
            .map_err(PaymentError::into_upstream_failure);
        self.record(PAYMENTS_ENDPOINT, &request, outcome)
    }

    /// Submit redirect or 3-D Secure results to complete a payment.
    #[instrument(skip(self, payload))]
    pub async fn payments_details(&self, payload: Value) -> PaymentResult<Value> {
        let present = |key: &str| payload.get(key).is_some_and(is_truthy);
        if !present("details") && !present("paymentData") {
            return Err(PaymentError::InvalidRequest(
                "details or paymentData required".to_string(),
            ));
        }

        let gateway = self.gateway()?;
        let outcome = gateway
            .payments_details(payload.clone())
            .await
            .map_err(PaymentError::into_upstream_failure);
        self.record(PAYMENTS_DETAILS_ENDPOINT, &payload, outcome)
    }

    fn record(
        &self,
        endpoint: &'static str,
        request: &Value,
        outcome: PaymentResult<Value>,
    ) -> PaymentResult<Value> {
        match outcome {
            Ok(response) => {
                let entry = self
                    .logs
                    .append(endpoint, Some(request), Some(response.clone()), None);
                info!(log_id = %entry.id, "{} succeeded", endpoint);
                Ok(response)
            }
            Err(err) => {
                let entry = self.logs.append(endpoint, Some(request), None, Some(err.log_detail()));
                if err.is_upstream() {
                    error!(log_id = %entry.id, error = ?err, "{} failed", endpoint);
                } else {
                    warn!(log_id = %entry.id, error = ?err, "{} not sent", endpoint);
                }
                Err(err)
            }
        }
    }
}

/// `ref-` followed by 16 hex characters
fn generate_reference() -> String {
    format!("ref-{}", &Uuid::new_v4().simple().to_string()[..16])
}

/// `amount` must be an object carrying a numeric `value`.
fn has_amount(request: &Map<String, Value>) -> bool {
    match request.get("amount") {
        Some(Value::Object(amount)) => amount.get("value").is_some_and(Value::is_number),
        _ => false,
    }
}

/// Integral number, or a string holding one, as minor units.
fn minor_units<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(value)) => Ok(Some(value)),
        Some(Raw::Float(value)) if value.fract() == 0.0 => Ok(Some(value as i64)),
        Some(Raw::Float(value)) => Err(de::Error::custom(format!(
            "amount value {} is not in minor units",
            value
        ))),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("amount value {:?} is not a number", text))),
    }
}

/// JSON truthiness: null, false, 0, "" and empty containers count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
