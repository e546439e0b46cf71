//! Payment handlers.
//!
//! Command handlers for the gateway checkout lifecycle:
//!
//! ## Commands
//! - Starting a hosted checkout (order registration and payment key)
//! - Paying a payment key directly with card details
//! - Capturing an authorised transaction
//! - Reconciling processed callbacks into order status

mod capture_transaction;
mod pay_with_card;
mod reconcile_callback;
mod start_checkout;

pub use capture_transaction::{CaptureTransactionCommand, CaptureTransactionHandler};
pub use pay_with_card::{PayWithCardCommand, PayWithCardHandler, PaymentError};
pub use reconcile_callback::{
    ReconcileCallbackCommand, ReconcileCallbackHandler, ReconcileError, ReconcileOutcome,
};
pub use start_checkout::{
    CheckoutError, CheckoutSettings, StartCheckoutCommand, StartCheckoutHandler,
    StartCheckoutResult, DEFAULT_CURRENCY, DEFAULT_PAYMENT_KEY_EXPIRATION_SECS,
};
