//! Order domain errors.

use thiserror::Error;

use crate::domain::foundation::{LocalOrderId, RemoteOrderId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The order is already correlated with a different gateway order.
    #[error("Order {order_id} is already registered as gateway order {existing}, refusing {attempted}")]
    RemoteOrderConflict {
        order_id: LocalOrderId,
        existing: RemoteOrderId,
        attempted: RemoteOrderId,
    },

    /// The order was never registered with the gateway.
    #[error("Order {0} has no gateway order")]
    NotRegistered(LocalOrderId),
}
