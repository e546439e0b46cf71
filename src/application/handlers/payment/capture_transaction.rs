//! CaptureTransactionHandler - Command handler for capturing authorised payments.

use std::sync::Arc;

use crate::domain::foundation::{TransactionId, ValidationError};
use crate::ports::{Credentials, GatewayError, PaymentGateway, Transaction};

/// Command to capture an authorised transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTransactionCommand {
    pub transaction_id: TransactionId,
    pub amount_cents: u64,
}

/// Handler for capturing authorised transactions.
pub struct CaptureTransactionHandler {
    gateway: Arc<dyn PaymentGateway>,
    credentials: Credentials,
}

impl CaptureTransactionHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, credentials: Credentials) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    pub async fn handle(&self, cmd: CaptureTransactionCommand) -> Result<Transaction, GatewayError> {
        if cmd.amount_cents == 0 {
            return Err(ValidationError::out_of_range("amount_cents", 1, i64::MAX, 0).into());
        }

        let auth = self.gateway.authenticate(&self.credentials).await?;
        self.gateway
            .capture(&auth.token, cmd.transaction_id, cmd.amount_cents)
            .await
    }
}
