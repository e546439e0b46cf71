//! Caller-supplied payment data.
//!
//! Billing profiles for payment keys and the card/payer details of a direct
//! card payment. Card fields are validated on construction so malformed
//! input never reaches the gateway.

mod billing;
mod card;

pub use billing::BillingData;
pub use card::{CardDetails, PayerDetails};
