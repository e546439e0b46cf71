//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod payment;

pub use payment::{
    // Checkout
    CheckoutError, CheckoutSettings, StartCheckoutCommand, StartCheckoutHandler,
    StartCheckoutResult,
    // Card payments
    PayWithCardCommand, PayWithCardHandler, PaymentError,
    // Capture
    CaptureTransactionCommand, CaptureTransactionHandler,
    // Callback reconciliation
    ReconcileCallbackCommand, ReconcileCallbackHandler, ReconcileError, ReconcileOutcome,
};
