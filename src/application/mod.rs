//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    CaptureTransactionCommand, CaptureTransactionHandler, CheckoutError, CheckoutSettings,
    PayWithCardCommand, PayWithCardHandler, PaymentError, ReconcileCallbackCommand,
    ReconcileCallbackHandler, ReconcileError, ReconcileOutcome, StartCheckoutCommand,
    StartCheckoutHandler, StartCheckoutResult,
};
