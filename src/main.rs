//! Processed-callback service.
//!
//! Reference wiring only: serves the gateway webhook over an empty in-memory
//! order store and logs every resolved payment. Until orders are saved into
//! that store, every callback resolves to an unknown order.
//!
//! A shop embeds the library instead and builds the router with its own
//! ports:
//!
//! ```ignore
//! let state = CallbackAppState::new(shop_order_repository, shop_status_handler)
//!     .with_signature(signature);
//! let app = callback_app(state, config.server.request_timeout());
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use paymob_accept::adapters::{
    callback_app, CallbackAppState, InMemoryOrderRepository, TracingStatusHandler,
};
use paymob_accept::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    init_tracing(&config);
    config.validate()?;

    let mut state = CallbackAppState::new(
        Arc::new(InMemoryOrderRepository::new()),
        Arc::new(TracingStatusHandler),
    );
    match config.paymob.callback_signature() {
        Some(signature) => state = state.with_signature(signature),
        None => tracing::warn!("No HMAC secret configured, processed callbacks are not verified"),
    }

    let app = callback_app(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening for processed callbacks");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
