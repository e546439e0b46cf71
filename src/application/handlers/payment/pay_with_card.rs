//! PayWithCardHandler - Command handler for direct card payments.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::LocalOrderId;
use crate::domain::order::OrderError;
use crate::domain::payment::{CardDetails, PayerDetails};
use crate::ports::{
    CardPaymentRequest, GatewayError, OrderRepository, PaymentGateway, PaymentKeyToken,
    RepositoryError, Transaction,
};

/// Command to pay a checkout's payment key with card details.
#[derive(Debug, Clone)]
pub struct PayWithCardCommand {
    pub order_id: LocalOrderId,
    pub payment_key: PaymentKeyToken,
    pub card: CardDetails,
    pub payer: PayerDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Order {0} not found")]
    OrderNotFound(LocalOrderId),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Handler for direct card payments.
///
/// The order status is left alone: the gateway reports the final outcome
/// through the processed callback.
pub struct PayWithCardHandler {
    repository: Arc<dyn OrderRepository>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PayWithCardHandler {
    pub fn new(repository: Arc<dyn OrderRepository>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            repository,
            gateway,
        }
    }

    pub async fn handle(&self, cmd: PayWithCardCommand) -> Result<Transaction, PaymentError> {
        let order = self
            .repository
            .find_by_id(cmd.order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound(cmd.order_id))?;

        let remote_order_id = order.require_remote_order()?;

        let transaction = self
            .gateway
            .submit_payment(CardPaymentRequest {
                payment_key: cmd.payment_key,
                card: cmd.card,
                payer: cmd.payer,
                order_id: remote_order_id,
            })
            .await?;

        tracing::info!(
            order_id = %order.id(),
            transaction_id = %transaction.id,
            pending = transaction.pending,
            is_3d_secure = transaction.is_3d_secure,
            "Card payment accepted by gateway"
        );

        Ok(transaction)
    }
}
