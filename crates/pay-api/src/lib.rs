//! # pay-api
//!
//! HTTP layer for dropin-checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - JSON endpoints relaying Drop-in calls to Adyen
//! - Server-rendered checkout pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/health` | Health check |
//! | GET | `/api/items` | Sample items |
//! | POST | `/api/adyen/paymentMethods` | Available payment methods |
//! | POST | `/api/adyen/payments` | Submit payment |
//! | POST | `/api/adyen/payments/details` | Submit redirect/3DS details |
//! | GET | `/api/adyen/logs` | Recent Adyen calls (redacted) |
//! | GET | `/`, `/about`, `/checkout`, `/api-logs` | Pages |
//! | GET/POST | `/checkout/return` | Redirect landing page |
//! | GET | `/checkout/success`, `/checkout/failed` | Result pages |

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
