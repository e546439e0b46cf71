//! Mock payment gateway for testing.
//!
//! Provides a configurable in-process implementation of `PaymentGateway` for
//! unit and integration tests. Supports:
//! - Merchant order id uniqueness, like the real gateway
//! - Error injection, per call or per method
//! - Call tracking

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Map;

use crate::domain::foundation::{MerchantId, RemoteOrderId, TransactionId};
use crate::domain::payment::BillingData;
use crate::ports::{
    Authentication, CardPaymentRequest, CreateOrderRequest, Credentials, GatewayError,
    GatewayToken, MerchantProfile, Page, PaymentGateway, PaymentKeyRequest, PaymentKeyToken,
    RemoteOrder, Transaction,
};

/// Token handed out by [`MockPaymentGateway::authenticate`].
pub const MOCK_TOKEN: &str = "mock_token";

const FIRST_REMOTE_ORDER_ID: u64 = 70_000;
const FIRST_TRANSACTION_ID: u64 = 30_000;

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.set_method_error("capture", GatewayError::Transport("timeout".into()));
/// let gateway: Arc<dyn PaymentGateway> = Arc::new(mock.clone());
/// ```
#[derive(Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    merchant_id: u64,

    /// Merchant order ids already registered.
    merchant_order_ids: HashSet<String>,

    orders: HashMap<RemoteOrderId, RemoteOrder>,

    transactions: HashMap<TransactionId, Transaction>,

    /// Billing data of the last payment key request.
    last_billing: Option<BillingData>,

    /// Transaction returned by the next payment; defaults to a success.
    next_payment: Option<Transaction>,

    next_order_seq: u64,

    next_transaction_seq: u64,

    /// Error to return on the next call to any method.
    next_error: Option<GatewayError>,

    /// Sticky errors by method name.
    method_errors: HashMap<String, GatewayError>,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::with_merchant_id(MerchantId::new(1))
    }

    /// Create a mock whose authentication profile carries `merchant_id`.
    pub fn with_merchant_id(merchant_id: MerchantId) -> Self {
        let mock = Self::default();
        mock.state().merchant_id = merchant_id.value();
        mock
    }

    /// Create a mock that rejects every authentication.
    pub fn rejecting_credentials() -> Self {
        let mock = Self::new();
        mock.set_method_error(
            "authenticate",
            GatewayError::AuthenticationFailed {
                detail: "incorrect credentials".to_string(),
            },
        );
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Mark a merchant order id as already registered.
    pub fn register_merchant_order_id(&self, merchant_order_id: impl Into<String>) {
        self.state().merchant_order_ids.insert(merchant_order_id.into());
    }

    /// Add a transaction to the "gateway".
    pub fn add_transaction(&self, transaction: Transaction) {
        self.state()
            .transactions
            .insert(transaction.id, transaction);
    }

    /// Set the transaction returned by the next `submit_payment`.
    pub fn set_next_payment(&self, transaction: Transaction) {
        self.state().next_payment = Some(transaction);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: GatewayError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for every call to a specific method.
    pub fn set_method_error(&self, method: &str, error: GatewayError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Billing data sent with the last payment key request.
    pub fn last_billing(&self) -> Option<BillingData> {
        self.state().last_billing.clone()
    }

    pub fn order(&self, id: RemoteOrderId) -> Option<RemoteOrder> {
        self.state().orders.get(&id).cloned()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), GatewayError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    fn check_token(token: &GatewayToken) -> Result<(), GatewayError> {
        if token.expose() != MOCK_TOKEN {
            return Err(GatewayError::AuthenticationFailed {
                detail: "invalid token".to_string(),
            });
        }
        Ok(())
    }

    fn next_transaction_id(state: &mut MockState) -> TransactionId {
        let id = FIRST_TRANSACTION_ID + state.next_transaction_seq;
        state.next_transaction_seq += 1;
        TransactionId::new(id)
    }
}

impl Clone for MockPaymentGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A successful, captured transaction with no order reference.
pub fn approved_transaction(id: TransactionId, amount_cents: i64) -> Transaction {
    Transaction {
        id,
        success: true,
        pending: false,
        is_auth: false,
        is_capture: false,
        is_voided: false,
        is_refunded: false,
        is_3d_secure: false,
        amount_cents,
        currency: Some("EGP".to_string()),
        order: None,
        source_data: None,
        extra: Map::new(),
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authentication, GatewayError> {
        self.record_call("authenticate", vec![credentials.username.clone()]);
        self.check_error("authenticate")?;

        let merchant_id = self.state().merchant_id;
        Ok(Authentication {
            token: GatewayToken::new(MOCK_TOKEN),
            profile: MerchantProfile {
                id: MerchantId::new(merchant_id),
                extra: Map::new(),
            },
            extra: Map::new(),
        })
    }

    async fn create_order(
        &self,
        token: &GatewayToken,
        request: CreateOrderRequest,
    ) -> Result<RemoteOrder, GatewayError> {
        self.record_call(
            "create_order",
            vec![
                request.merchant_order_id.clone(),
                request.amount_cents.to_string(),
            ],
        );
        self.check_error("create_order")?;
        Self::check_token(token)?;

        let mut state = self.state();

        if !state
            .merchant_order_ids
            .insert(request.merchant_order_id.clone())
        {
            return Err(GatewayError::DuplicateOrder {
                merchant_order_id: request.merchant_order_id,
            });
        }

        let id = RemoteOrderId::new(FIRST_REMOTE_ORDER_ID + state.next_order_seq);
        state.next_order_seq += 1;

        let order = RemoteOrder {
            id,
            merchant_order_id: Some(request.merchant_order_id),
            amount_cents: request.amount_cents as i64,
            paid_amount_cents: 0,
            currency: Some(request.currency),
            extra: Map::new(),
        };
        state.orders.insert(id, order.clone());

        Ok(order)
    }

    async fn request_payment_key(
        &self,
        token: &GatewayToken,
        request: PaymentKeyRequest,
    ) -> Result<PaymentKeyToken, GatewayError> {
        self.record_call(
            "request_payment_key",
            vec![request.order_id.to_string(), request.amount_cents.to_string()],
        );
        self.check_error("request_payment_key")?;
        Self::check_token(token)?;

        let mut state = self.state();
        state.last_billing = Some(request.billing);

        Ok(PaymentKeyToken::new(format!("pk_mock_{}", request.order_id)))
    }

    async fn submit_payment(&self, request: CardPaymentRequest) -> Result<Transaction, GatewayError> {
        self.record_call(
            "submit_payment",
            vec![
                request.payment_key.to_string(),
                request.card.last_four().to_string(),
            ],
        );
        self.check_error("submit_payment")?;

        let mut state = self.state();

        let mut transaction = match state.next_payment.take() {
            Some(transaction) => transaction,
            None => {
                let id = Self::next_transaction_id(&mut state);
                let amount = state
                    .orders
                    .get(&request.order_id)
                    .map_or(0, |order| order.amount_cents);
                approved_transaction(id, amount)
            }
        };
        transaction.order.get_or_insert(request.order_id);
        state.transactions.insert(transaction.id, transaction.clone());

        Ok(transaction)
    }

    async fn capture(
        &self,
        token: &GatewayToken,
        transaction_id: TransactionId,
        amount_cents: u64,
    ) -> Result<Transaction, GatewayError> {
        self.record_call(
            "capture",
            vec![transaction_id.to_string(), amount_cents.to_string()],
        );
        self.check_error("capture")?;
        Self::check_token(token)?;

        let mut state = self.state();

        let parent = state
            .transactions
            .get(&transaction_id)
            .cloned()
            .ok_or_else(|| GatewayError::Rejected {
                status: 404,
                message: format!("Transaction {} not found", transaction_id),
            })?;

        let id = Self::next_transaction_id(&mut state);
        let mut capture = approved_transaction(id, amount_cents as i64);
        capture.is_capture = true;
        capture.order = parent.order;
        state.transactions.insert(id, capture.clone());

        Ok(capture)
    }

    async fn list_orders(
        &self,
        token: &GatewayToken,
        page: u32,
    ) -> Result<Page<RemoteOrder>, GatewayError> {
        self.record_call("list_orders", vec![page.to_string()]);
        self.check_error("list_orders")?;
        Self::check_token(token)?;

        let mut results: Vec<RemoteOrder> = self.state().orders.values().cloned().collect();
        results.sort_by_key(|order| order.id.value());
        Ok(single_page(page, results))
    }

    async fn get_order(
        &self,
        token: &GatewayToken,
        order_id: RemoteOrderId,
    ) -> Result<RemoteOrder, GatewayError> {
        self.record_call("get_order", vec![order_id.to_string()]);
        self.check_error("get_order")?;
        Self::check_token(token)?;

        self.state()
            .orders
            .get(&order_id)
            .cloned()
            .ok_or_else(|| GatewayError::Rejected {
                status: 404,
                message: format!("Order {} not found", order_id),
            })
    }

    async fn list_transactions(
        &self,
        token: &GatewayToken,
        page: u32,
    ) -> Result<Page<Transaction>, GatewayError> {
        self.record_call("list_transactions", vec![page.to_string()]);
        self.check_error("list_transactions")?;
        Self::check_token(token)?;

        let mut results: Vec<Transaction> =
            self.state().transactions.values().cloned().collect();
        results.sort_by_key(|txn| txn.id.value());
        Ok(single_page(page, results))
    }

    async fn get_transaction(
        &self,
        token: &GatewayToken,
        transaction_id: TransactionId,
    ) -> Result<Transaction, GatewayError> {
        self.record_call("get_transaction", vec![transaction_id.to_string()]);
        self.check_error("get_transaction")?;
        Self::check_token(token)?;

        self.state()
            .transactions
            .get(&transaction_id)
            .cloned()
            .ok_or_else(|| GatewayError::Rejected {
                status: 404,
                message: format!("Transaction {} not found", transaction_id),
            })
    }
}

/// Everything fits on page 1; later pages are empty.
fn single_page<T>(page: u32, results: Vec<T>) -> Page<T> {
    let count = results.len() as u64;
    Page {
        count: Some(count),
        next: None,
        previous: None,
        results: if page <= 1 { results } else { Vec::new() },
        extra: Map::new(),
    }
}
