//! HTTP handlers for the processed-callback endpoint.
//!
//! The gateway retries deliveries it considers failed, so every request is
//! acknowledged with `200 {"success": true}`. Rejected or unusable callbacks
//! are logged and dropped.
//!
//! Reconciliation runs on its own task. The response waits for it at most
//! `reconcile_timeout`; a slower reconciliation keeps running after the
//! acknowledgement is sent.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;

use crate::adapters::paymob::{CallbackSignature, ProcessedCallback};
use crate::application::handlers::{ReconcileCallbackCommand, ReconcileCallbackHandler};
use crate::ports::{OrderRepository, OrderStatusHandler};

use super::dto::{AckResponse, CallbackQuery};

/// How long a callback response waits for reconciliation by default.
pub const DEFAULT_RECONCILE_TIMEOUT: Duration = Duration::from_secs(30);

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the callback endpoint.
#[derive(Clone)]
pub struct CallbackAppState {
    pub order_repository: Arc<dyn OrderRepository>,
    pub status_handler: Arc<dyn OrderStatusHandler>,
    /// Verifier for callback signatures. `None` disables verification.
    pub signature: Option<CallbackSignature>,
    /// Upper bound on how long the response waits for reconciliation.
    pub reconcile_timeout: Duration,
}

impl CallbackAppState {
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        status_handler: Arc<dyn OrderStatusHandler>,
    ) -> Self {
        Self {
            order_repository,
            status_handler,
            signature: None,
            reconcile_timeout: DEFAULT_RECONCILE_TIMEOUT,
        }
    }

    pub fn with_signature(mut self, signature: CallbackSignature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn with_reconcile_timeout(mut self, timeout: Duration) -> Self {
        self.reconcile_timeout = timeout;
        self
    }

    pub fn reconcile_handler(&self) -> ReconcileCallbackHandler {
        ReconcileCallbackHandler::new(
            self.order_repository.clone(),
            self.status_handler.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/paymob/callbacks/processed
pub async fn handle_processed_callback(
    State(state): State<CallbackAppState>,
    query: Option<Query<CallbackQuery>>,
    body: Bytes,
) -> Json<AckResponse> {
    let callback = match ProcessedCallback::parse(&body) {
        Ok(callback) => callback,
        Err(e) => {
            tracing::warn!(error = %e, body_len = body.len(), "Discarding undecodable processed callback");
            return Json(AckResponse::ack());
        }
    };

    if !callback.is_transaction() {
        tracing::debug!(kind = ?callback.kind(), "Ignoring non-transaction callback");
        return Json(AckResponse::ack());
    }

    if let Some(signature) = &state.signature {
        let provided = query.as_ref().and_then(|Query(q)| q.hmac.as_deref());
        if let Err(e) = signature.verify(&callback, provided) {
            tracing::warn!(
                error = %e,
                transaction_id = ?callback.transaction_id(),
                remote_order_id = ?callback.remote_order_id(),
                "Rejected processed callback signature"
            );
            return Json(AckResponse::ack());
        }
    }

    let cmd = ReconcileCallbackCommand {
        remote_order_id: callback.remote_order_id(),
        transaction_id: callback.transaction_id(),
        flags: callback.flags(),
    };

    let handler = state.reconcile_handler();
    let reconciliation = tokio::spawn(async move { handler.handle(cmd).await });

    match tokio::time::timeout(state.reconcile_timeout, reconciliation).await {
        Ok(Ok(Ok(outcome))) => tracing::debug!(?outcome, "Processed callback handled"),
        Ok(Ok(Err(e))) => tracing::error!(
            error = %e,
            remote_order_id = ?cmd.remote_order_id,
            "Failed to reconcile processed callback"
        ),
        Ok(Err(e)) => tracing::error!(
            error = %e,
            remote_order_id = ?cmd.remote_order_id,
            "Reconciliation task aborted"
        ),
        Err(_) => tracing::warn!(
            remote_order_id = ?cmd.remote_order_id,
            timeout_ms = state.reconcile_timeout.as_millis() as u64,
            "Reconciliation still running, acknowledging callback"
        ),
    }

    Json(AckResponse::ack())
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
