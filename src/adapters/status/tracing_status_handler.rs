//! Order status hooks that only emit log events.

use async_trait::async_trait;

use crate::domain::order::LocalOrder;
use crate::ports::OrderStatusHandler;

/// `OrderStatusHandler` that records each resolved payment as a log event.
///
/// Used by the bundled binary, where no fulfilment system is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatusHandler;

#[async_trait]
impl OrderStatusHandler for TracingStatusHandler {
    async fn succeeded(&self, order: &LocalOrder) {
        tracing::info!(
            order_id = %order.id(),
            amount_cents = order.amount_cents(),
            currency = order.currency(),
            "Order paid"
        );
    }

    async fn voided(&self, order: &LocalOrder) {
        tracing::info!(order_id = %order.id(), "Order payment voided");
    }

    async fn refunded(&self, order: &LocalOrder) {
        tracing::info!(order_id = %order.id(), "Order payment refunded");
    }

    async fn failed(&self, order: &LocalOrder) {
        tracing::warn!(order_id = %order.id(), "Order payment failed");
    }
}
