//! # Routes
//!
//! Axum router configuration: JSON API under `/api`, HTML pages at the root.

use crate::handlers;
use crate::pages;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - API:
///   - GET  /api/health
///   - GET  /api/items
///   - POST /api/adyen/paymentMethods
///   - POST /api/adyen/payments
///   - POST /api/adyen/payments/details
///   - GET  /api/adyen/logs
///
/// - Pages:
///   - GET /, /about, /checkout, /checkout/success, /checkout/failed, /api-logs
///   - GET|POST /checkout/return
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let adyen_routes = Router::new()
        .route("/paymentMethods", post(handlers::adyen_payment_methods))
        .route("/payments", post(handlers::adyen_payments))
        .route("/payments/details", post(handlers::adyen_payments_details))
        .route("/logs", get(handlers::adyen_logs));

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/items", get(handlers::list_items))
        .nest("/adyen", adyen_routes);

    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/checkout", get(pages::checkout))
        .route(
            "/checkout/return",
            get(pages::checkout_return).post(pages::checkout_return_post),
        )
        .route("/checkout/success", get(pages::checkout_success))
        .route("/checkout/failed", get(pages::checkout_failed))
        .route("/api-logs", get(pages::api_logs));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
