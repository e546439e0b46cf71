//! Local order correlation and payment status reconciliation.
//!
//! A `LocalOrder` belongs to the surrounding shop. This module tracks its
//! single association with a gateway order and resolves processed-callback
//! flags into a terminal status.

mod errors;
mod local_order;
mod reconciliation;
mod status;

pub use errors::OrderError;
pub use local_order::LocalOrder;
pub use reconciliation::{PaymentOutcome, TransactionFlags};
pub use status::OrderStatus;
