//! ReconcileCallbackHandler - Command handler for processed-callback reconciliation.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{LocalOrderId, RemoteOrderId, TransactionId};
use crate::domain::order::{OrderStatus, PaymentOutcome, TransactionFlags};
use crate::ports::{OrderRepository, OrderStatusHandler, RepositoryError};

/// Command carrying the decoded fields of a processed callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileCallbackCommand {
    pub remote_order_id: Option<RemoteOrderId>,
    pub transaction_id: Option<TransactionId>,
    pub flags: TransactionFlags,
}

/// Result of reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The correlated order was updated and its status hook invoked.
    Applied {
        order_id: LocalOrderId,
        previous: OrderStatus,
        outcome: PaymentOutcome,
    },

    /// No local order is correlated with the gateway order.
    OrderNotFound {
        remote_order_id: RemoteOrderId,
        outcome: PaymentOutcome,
    },

    /// The callback named no gateway order.
    MissingOrderReference { outcome: PaymentOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Handler for processed callbacks.
///
/// Resolves the callback flags to an outcome, overwrites the correlated
/// order's status and invokes exactly one status hook. Repeated or
/// out-of-order deliveries simply overwrite again.
pub struct ReconcileCallbackHandler {
    repository: Arc<dyn OrderRepository>,
    status_handler: Arc<dyn OrderStatusHandler>,
}

impl ReconcileCallbackHandler {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        status_handler: Arc<dyn OrderStatusHandler>,
    ) -> Self {
        Self {
            repository,
            status_handler,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileCallbackCommand,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let outcome = PaymentOutcome::resolve(cmd.flags);

        let Some(remote_order_id) = cmd.remote_order_id else {
            tracing::warn!(
                transaction_id = ?cmd.transaction_id,
                outcome = outcome.as_str(),
                "Processed callback carries no order reference"
            );
            return Ok(ReconcileOutcome::MissingOrderReference { outcome });
        };

        let Some(mut order) = self
            .repository
            .find_by_remote_order_id(remote_order_id)
            .await?
        else {
            tracing::warn!(
                remote_order_id = %remote_order_id,
                transaction_id = ?cmd.transaction_id,
                outcome = outcome.as_str(),
                "Processed callback for unknown order"
            );
            return Ok(ReconcileOutcome::OrderNotFound {
                remote_order_id,
                outcome,
            });
        };

        let previous = order.status();
        order.apply_outcome(outcome);
        self.repository.save(&order).await?;

        tracing::info!(
            order_id = %order.id(),
            remote_order_id = %remote_order_id,
            transaction_id = ?cmd.transaction_id,
            previous = previous.as_str(),
            status = order.status().as_str(),
            "Order status reconciled"
        );

        self.status_handler.dispatch(outcome, &order).await;

        Ok(ReconcileOutcome::Applied {
            order_id: order.id(),
            previous,
            outcome,
        })
    }
}
