//! Order repository port.
//!
//! Persists the shop's local orders and correlates them with gateway orders.
//!
//! # Design
//!
//! - **Correlation lookup**: processed callbacks only carry the gateway
//!   order id, so the repository must index orders by it
//! - **Overwrite semantics**: `save` replaces the stored order; callers rely
//!   on this for idempotent status updates

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{LocalOrderId, RemoteOrderId};
use crate::domain::order::LocalOrder;

/// Repository port for local orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by its local id.
    async fn find_by_id(&self, id: LocalOrderId) -> Result<Option<LocalOrder>, RepositoryError>;

    /// Find the order registered as `remote_order_id` on the gateway.
    async fn find_by_remote_order_id(
        &self,
        remote_order_id: RemoteOrderId,
    ) -> Result<Option<LocalOrder>, RepositoryError>;

    /// Insert or replace an order.
    ///
    /// # Errors
    ///
    /// - `RemoteOrderTaken` if another order is already correlated with the
    ///   same gateway order id
    async fn save(&self, order: &LocalOrder) -> Result<(), RepositoryError>;
}

/// Errors from order persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Gateway order {remote_order_id} already belongs to order {owner}")]
    RemoteOrderTaken {
        remote_order_id: RemoteOrderId,
        owner: LocalOrderId,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}
