//! Axum router configuration for the processed-callback endpoint.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{handle_processed_callback, health, CallbackAppState};

/// Path the gateway posts processed callbacks to.
pub const PROCESSED_CALLBACK_PATH: &str = "/api/paymob/callbacks/processed";

/// Create the callback router.
///
/// # Routes
/// - `POST /api/paymob/callbacks/processed` - Reconcile a processed callback
/// - `GET /health` - Liveness probe
pub fn callback_routes() -> Router<CallbackAppState> {
    Router::new()
        .route(PROCESSED_CALLBACK_PATH, post(handle_processed_callback))
        .route("/health", get(health))
}

/// Create the complete service with request tracing.
///
/// `reconcile_timeout` bounds how long a callback response waits for
/// reconciliation. No request-level timeout is applied, so a callback is
/// never answered with anything but `200`.
///
/// # Example
///
/// ```ignore
/// let state = CallbackAppState::new(repository, status_handler);
/// let app = callback_app(state, Duration::from_secs(30));
/// axum::serve(listener, app).await?;
/// ```
pub fn callback_app(state: CallbackAppState, reconcile_timeout: Duration) -> Router {
    callback_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state.with_reconcile_timeout(reconcile_timeout))
}
