//! Order status hook adapters.

mod tracing_status_handler;

pub use tracing_status_handler::TracingStatusHandler;
