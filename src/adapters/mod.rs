//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `paymob` - Gateway REST client, mock gateway and callback decoding
//! - `memory` - In-memory order repository
//! - `status` - Order status hooks
//! - `http` - Callback endpoint

pub mod http;
pub mod memory;
pub mod paymob;
pub mod status;

pub use http::{callback_app, CallbackAppState};
pub use memory::InMemoryOrderRepository;
pub use paymob::{
    CallbackSignature, MockPaymentGateway, PaymobClient, PaymobClientConfig, ProcessedCallback,
};
pub use status::TracingStatusHandler;
