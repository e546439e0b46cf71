//! Local order payment status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PaymentOutcome;

/// Payment status of a local order.
///
/// `Pending` is the only non-terminal state. The remaining states are set
/// exclusively from processed callbacks and may be overwritten by later
/// deliveries; there is no transition guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting a processed callback.
    #[default]
    Pending,

    /// Payment captured successfully.
    Paid,

    /// Transaction voided by the merchant or gateway.
    Voided,

    /// Transaction refunded.
    Refunded,

    /// Transaction declined or errored.
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Voided => "voided",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl From<PaymentOutcome> for OrderStatus {
    fn from(outcome: PaymentOutcome) -> Self {
        match outcome {
            PaymentOutcome::Succeeded => OrderStatus::Paid,
            PaymentOutcome::Voided => OrderStatus::Voided,
            PaymentOutcome::Refunded => OrderStatus::Refunded,
            PaymentOutcome::Failed => OrderStatus::Failed,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
