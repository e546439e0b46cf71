//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, lenient coercion, validation errors)
//! - `order` - Local order correlation and processed-callback status resolution
//! - `payment` - Billing profiles, card and payer details

pub mod foundation;
pub mod order;
pub mod payment;
