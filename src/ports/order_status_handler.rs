//! Terminal order status hooks.
//!
//! Invoked by the callback reconciler after the new status has been
//! persisted, exactly once per reconciled callback. Implementations carry
//! the shop-specific follow-up (emails, fulfilment, stock release).

use async_trait::async_trait;

use crate::domain::order::{LocalOrder, PaymentOutcome};

/// Port for side effects of a resolved payment.
#[async_trait]
pub trait OrderStatusHandler: Send + Sync {
    async fn succeeded(&self, order: &LocalOrder);

    async fn voided(&self, order: &LocalOrder);

    async fn refunded(&self, order: &LocalOrder);

    async fn failed(&self, order: &LocalOrder);

    /// Routes to the hook matching `outcome`.
    async fn dispatch(&self, outcome: PaymentOutcome, order: &LocalOrder) {
        match outcome {
            PaymentOutcome::Succeeded => self.succeeded(order).await,
            PaymentOutcome::Voided => self.voided(order).await,
            PaymentOutcome::Refunded => self.refunded(order).await,
            PaymentOutcome::Failed => self.failed(order).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::LocalOrderId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl OrderStatusHandler for RecordingHandler {
        async fn succeeded(&self, _order: &LocalOrder) {
            self.calls.lock().unwrap().push("succeeded");
        }

        async fn voided(&self, _order: &LocalOrder) {
            self.calls.lock().unwrap().push("voided");
        }

        async fn refunded(&self, _order: &LocalOrder) {
            self.calls.lock().unwrap().push("refunded");
        }

        async fn failed(&self, _order: &LocalOrder) {
            self.calls.lock().unwrap().push("failed");
        }
    }

    #[tokio::test]
    async fn dispatch_invokes_exactly_one_hook() {
        let handler = RecordingHandler::default();
        let order = LocalOrder::new(LocalOrderId::new(1), 100, "EGP");

        handler.dispatch(PaymentOutcome::Refunded, &order).await;

        assert_eq!(*handler.calls.lock().unwrap(), vec!["refunded"]);
    }

    #[tokio::test]
    async fn dispatch_routes_every_outcome() {
        let handler = RecordingHandler::default();
        let order = LocalOrder::new(LocalOrderId::new(1), 100, "EGP");

        for outcome in [
            PaymentOutcome::Succeeded,
            PaymentOutcome::Voided,
            PaymentOutcome::Refunded,
            PaymentOutcome::Failed,
        ] {
            handler.dispatch(outcome, &order).await;
        }

        assert_eq!(
            *handler.calls.lock().unwrap(),
            vec!["succeeded", "voided", "refunded", "failed"]
        );
    }
}
