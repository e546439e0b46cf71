//! HTTP adapters - REST API implementations.

pub mod callback;

pub use callback::{callback_app, callback_routes, CallbackAppState};
