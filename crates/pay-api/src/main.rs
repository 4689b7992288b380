//! # Drop-in Checkout
//!
//! Demo shop paying through Adyen Drop-in.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables (or put them in .env)
//! export ADYEN_API_KEY=AQE...
//! export ADYEN_CLIENT_KEY=test_...
//! export ADYEN_MERCHANT_ACCOUNT=YourCompanyECOM
//! export ADYEN_ENVIRONMENT=test
//!
//! # Run the server
//! dropin-checkout
//! ```

use pay_api::{routes, AppConfig, AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config);

    print_banner();

    if config.uses_dev_secret() && !config.debug {
        warn!("SECRET_KEY is the development default; set it before exposing this server");
    }

    let addr = config.socket_addr()?;
    let debug = config.debug;

    // Initialize application state
    let state = AppState::new(config)?;

    info!("Cart: {} items, total {}", state.cart.item_count(), state.cart.total().display());
    info!(
        "Adyen: {} ({})",
        if state.relay.is_configured() { "configured" } else { "not configured" },
        state.adyen.environment
    );

    let app = routes::create_router(state);

    info!("🚀 Drop-in checkout starting on http://{}", addr);

    if debug {
        info!("🛒 Checkout: http://{}/checkout", addr);
        info!("📝 API logs: http://{}/api-logs", addr);
        info!("❤️  Health: http://{}/api/health", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `LOG_FORMAT=json` switches to structured output; `RUST_LOG` overrides the level.
fn init_tracing(config: &AppConfig) {
    let level = if config.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
  🛒 Drop-in Checkout RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Adyen Drop-in demo shop
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
