//! HTTP adapter for gateway callbacks.
//!
//! Exposes:
//! - `POST /api/paymob/callbacks/processed` - Reconcile a processed callback
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{AckResponse, CallbackQuery};
pub use handlers::{CallbackAppState, DEFAULT_RECONCILE_TIMEOUT};
pub use routes::{callback_app, callback_routes, PROCESSED_CALLBACK_PATH};
