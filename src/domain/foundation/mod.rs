//! Foundation module - Shared domain primitives.
//!
//! Identifiers, lenient value coercion for gateway payloads, and the
//! validation error used by caller-facing value objects.

mod errors;
mod ids;
pub mod lenient;

pub use errors::ValidationError;
pub use ids::{LocalOrderId, MerchantId, RemoteOrderId, TransactionId};
