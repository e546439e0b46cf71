//! Local order entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LocalOrderId, RemoteOrderId};

use super::{OrderError, OrderStatus, PaymentOutcome};

/// An order owned by the shop, correlated with at most one gateway order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalOrder {
    id: LocalOrderId,
    amount_cents: u64,
    currency: String,
    remote_order_id: Option<RemoteOrderId>,
    status: OrderStatus,
    updated_at: DateTime<Utc>,
}

impl LocalOrder {
    /// Creates a pending order with no gateway association.
    pub fn new(id: LocalOrderId, amount_cents: u64, currency: impl Into<String>) -> Self {
        Self {
            id,
            amount_cents,
            currency: currency.into(),
            remote_order_id: None,
            status: OrderStatus::Pending,
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> LocalOrderId {
        self.id
    }

    pub fn amount_cents(&self) -> u64 {
        self.amount_cents
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn remote_order_id(&self) -> Option<RemoteOrderId> {
        self.remote_order_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn merchant_order_id(&self) -> String {
        self.id.merchant_order_id()
    }

    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }

    /// Returns the gateway order id or `NotRegistered`.
    pub fn require_remote_order(&self) -> Result<RemoteOrderId, OrderError> {
        self.remote_order_id.ok_or(OrderError::NotRegistered(self.id))
    }

    /// Records the gateway order this order was registered as.
    ///
    /// Re-attaching the same id is a no-op; a different id is rejected.
    pub fn attach_remote_order(&mut self, remote_order_id: RemoteOrderId) -> Result<(), OrderError> {
        match self.remote_order_id {
            Some(existing) if existing == remote_order_id => Ok(()),
            Some(existing) => Err(OrderError::RemoteOrderConflict {
                order_id: self.id,
                existing,
                attempted: remote_order_id,
            }),
            None => {
                self.remote_order_id = Some(remote_order_id);
                self.updated_at = Utc::now();
                Ok(())
            }
        }
    }

    /// Overwrites the status with the one implied by `outcome`.
    pub fn apply_outcome(&mut self, outcome: PaymentOutcome) {
        self.status = outcome.into();
        self.updated_at = Utc::now();
    }
}
