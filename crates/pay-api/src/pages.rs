//! # Pages
//!
//! Server-rendered HTML. Templates are compiled into the binary and rendered
//! with Tera (autoescaped). Pages hold no state of their own; payment progress
//! lives in the browser and in the Drop-in script.

use crate::state::AppState;
use axum::{
    extract::{Form, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::DateTime;
use pay_core::{ApiLogEntry, CheckoutUrls, Price};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Context, Tera};
use thiserror::Error;
use tracing::error;

/// Compiled page templates
pub type Templates = Arc<Tera>;

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("about.html", include_str!("../templates/about.html")),
    ("checkout.html", include_str!("../templates/checkout.html")),
    ("checkout_return.html", include_str!("../templates/checkout_return.html")),
    ("checkout_success.html", include_str!("../templates/checkout_success.html")),
    ("checkout_failed.html", include_str!("../templates/checkout_failed.html")),
    ("api_logs.html", include_str!("../templates/api_logs.html")),
];

pub fn load_templates() -> Result<Templates, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(Arc::new(tera))
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!("Page rendering failed: {:?}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

type PageResult = Result<Html<String>, PageError>;

fn render(state: &AppState, template: &str, title: &str, mut context: Context) -> PageResult {
    context.insert("title", title);
    Ok(Html(state.templates.render(template, &context)?))
}

fn render_plain(state: &AppState, template: &str, title: &str) -> PageResult {
    render(state, template, title, Context::new())
}

/// Where the client script sends the shopper once a payment settles
fn insert_result_urls(context: &mut Context, urls: &CheckoutUrls) {
    context.insert("success_url", &urls.success_url());
    context.insert("failed_url", &urls.failed_url());
}

// =============================================================================
// View Models
// =============================================================================

#[derive(Debug, Serialize)]
struct CartLineView {
    id: String,
    name: String,
    quantity: u32,
    unit_price: String,
    line_total: String,
}

#[derive(Debug, Serialize)]
struct LogEntryView {
    id: String,
    time: String,
    endpoint: String,
    request: Option<String>,
    response: Option<String>,
    error: Option<String>,
}

impl LogEntryView {
    fn from_entry(entry: &ApiLogEntry) -> Result<Self, serde_json::Error> {
        let pretty = |value: &Option<serde_json::Value>| {
            value.as_ref().map(serde_json::to_string_pretty).transpose()
        };

        Ok(Self {
            id: entry.id.clone(),
            time: DateTime::from_timestamp_millis(entry.ts)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
                .unwrap_or_else(|| entry.ts.to_string()),
            endpoint: entry.endpoint.clone(),
            request: pretty(&entry.request)?,
            response: pretty(&entry.response)?,
            error: entry.error.clone(),
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn index(State(state): State<AppState>) -> PageResult {
    render_plain(&state, "index.html", "Home")
}

pub async fn about(State(state): State<AppState>) -> PageResult {
    render_plain(&state, "about.html", "About")
}

/// Cart plus the Drop-in container
pub async fn checkout(State(state): State<AppState>, headers: HeaderMap) -> PageResult {
    let cart = &state.cart;
    let lines: Vec<CartLineView> = cart
        .items
        .iter()
        .map(|item| CartLineView {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: Price::from_cents(item.price_cents, cart.currency).display(),
            line_total: Price::from_cents(item.total_cents(), cart.currency).display(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("items", &lines);
    context.insert("total_cents", &cart.total_cents());
    context.insert("total_display", &cart.total().display());
    context.insert("currency", cart.currency.as_str());
    context.insert("client_key", &state.adyen.client_key);
    context.insert("environment", state.adyen.environment.as_str());
    context.insert("configured", &state.relay.is_configured());
    insert_result_urls(&mut context, &state.checkout_urls(&headers));

    render(&state, "checkout.html", "Checkout", context)
}

/// Shopper comes back from a redirect (GET with query string)
pub async fn checkout_return(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> PageResult {
    render_return(&state, &headers, &params)
}

/// Shopper comes back from a redirect (form POST, e.g. some 3-D Secure issuers)
pub async fn checkout_return_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<HashMap<String, String>>,
) -> PageResult {
    render_return(&state, &headers, &params)
}

fn render_return(
    state: &AppState,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
) -> PageResult {
    let mut context = Context::new();
    context.insert("redirect_params", &serde_json::to_string(params)?);
    insert_result_urls(&mut context, &state.checkout_urls(headers));
    render(state, "checkout_return.html", "Completing payment", context)
}

pub async fn checkout_success(State(state): State<AppState>) -> PageResult {
    render_plain(&state, "checkout_success.html", "Payment successful")
}

pub async fn checkout_failed(State(state): State<AppState>) -> PageResult {
    render_plain(&state, "checkout_failed.html", "Payment failed")
}

/// Developer view of the API log, newest first
pub async fn api_logs(State(state): State<AppState>) -> PageResult {
    let entries = state
        .logs()
        .list()
        .iter()
        .rev()
        .map(LogEntryView::from_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let mut context = Context::new();
    context.insert("entries", &entries);
    context.insert("capacity", &state.logs().capacity());
    render(&state, "api_logs.html", "API Logs", context)
}
