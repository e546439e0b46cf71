//! Processed-callback outcome resolution.
//!
//! The gateway reports a finished transaction as a set of independent
//! boolean flags. They are combinable, so the order of the checks in
//! [`PaymentOutcome::resolve`] is part of the contract: a successful
//! transaction that is both voided and refunded resolves to `Voided`.

use serde::{Deserialize, Serialize};

/// Status flags carried by a processed callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionFlags {
    pub success: bool,
    pub is_voided: bool,
    pub is_refunded: bool,
}

impl TransactionFlags {
    pub fn new(success: bool, is_voided: bool, is_refunded: bool) -> Self {
        Self {
            success,
            is_voided,
            is_refunded,
        }
    }
}

/// Terminal result of a gateway transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Voided,
    Refunded,
    Failed,
}

impl PaymentOutcome {
    /// Resolves callback flags to an outcome. First match wins:
    ///
    /// | success | voided | refunded | outcome   |
    /// |---------|--------|----------|-----------|
    /// | true    | false  | false    | Succeeded |
    /// | true    | true   | any      | Voided    |
    /// | true    | false  | true     | Refunded  |
    /// | false   | any    | any      | Failed    |
    pub fn resolve(flags: TransactionFlags) -> Self {
        let TransactionFlags {
            success,
            is_voided,
            is_refunded,
        } = flags;

        if success && !is_voided && !is_refunded {
            PaymentOutcome::Succeeded
        } else if success && is_voided {
            PaymentOutcome::Voided
        } else if success && is_refunded {
            PaymentOutcome::Refunded
        } else {
            PaymentOutcome::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOutcome::Succeeded => "succeeded",
            PaymentOutcome::Voided => "voided",
            PaymentOutcome::Refunded => "refunded",
            PaymentOutcome::Failed => "failed",
        }
    }
}
