//! Integration tests for the processed-callback endpoint.
//!
//! Drives the full router with both callback payload shapes and checks the
//! stored order status afterwards, including slow and failing reconciliation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use paymob_accept::adapters::http::callback::PROCESSED_CALLBACK_PATH;
use paymob_accept::adapters::{
    callback_app, CallbackAppState, CallbackSignature, InMemoryOrderRepository, ProcessedCallback,
};
use paymob_accept::domain::foundation::{LocalOrderId, RemoteOrderId};
use paymob_accept::domain::order::{LocalOrder, OrderStatus};
use paymob_accept::ports::{OrderRepository, OrderStatusHandler, RepositoryError};

const REMOTE_ORDER: u64 = 68010;
const HMAC_SECRET: &str = "callback-secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Records every hook, optionally after a delay.
#[derive(Default)]
struct RecordingStatusHandler {
    delay: Option<Duration>,
    calls: Mutex<Vec<(&'static str, LocalOrderId)>>,
}

impl RecordingStatusHandler {
    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<(&'static str, LocalOrderId)> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, hook: &'static str, order: &LocalOrder) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push((hook, order.id()));
    }
}

#[async_trait]
impl OrderStatusHandler for RecordingStatusHandler {
    async fn succeeded(&self, order: &LocalOrder) {
        self.record("succeeded", order).await;
    }

    async fn voided(&self, order: &LocalOrder) {
        self.record("voided", order).await;
    }

    async fn refunded(&self, order: &LocalOrder) {
        self.record("refunded", order).await;
    }

    async fn failed(&self, order: &LocalOrder) {
        self.record("failed", order).await;
    }
}

/// Repository whose storage is unavailable.
struct UnavailableRepository;

#[async_trait]
impl OrderRepository for UnavailableRepository {
    async fn find_by_id(&self, _id: LocalOrderId) -> Result<Option<LocalOrder>, RepositoryError> {
        Err(RepositoryError::Storage("connection refused".to_string()))
    }

    async fn find_by_remote_order_id(
        &self,
        _remote_order_id: RemoteOrderId,
    ) -> Result<Option<LocalOrder>, RepositoryError> {
        Err(RepositoryError::Storage("connection refused".to_string()))
    }

    async fn save(&self, _order: &LocalOrder) -> Result<(), RepositoryError> {
        Err(RepositoryError::Storage("connection refused".to_string()))
    }
}

struct Fixture {
    repository: Arc<InMemoryOrderRepository>,
    hooks: Arc<RecordingStatusHandler>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_hooks(RecordingStatusHandler::default())
    }

    fn with_hooks(hooks: RecordingStatusHandler) -> Self {
        let mut order = LocalOrder::new(LocalOrderId::new(42), 13000, "EGP");
        order
            .attach_remote_order(RemoteOrderId::new(REMOTE_ORDER))
            .unwrap();

        Self {
            repository: Arc::new(InMemoryOrderRepository::with_orders([order])),
            hooks: Arc::new(hooks),
        }
    }

    fn state(&self) -> CallbackAppState {
        CallbackAppState::new(self.repository.clone(), self.hooks.clone())
    }

    fn app(&self) -> Router {
        callback_app(self.state(), Duration::from_secs(5))
    }

    fn signed_app(&self) -> Router {
        callback_app(
            self.state()
                .with_signature(CallbackSignature::new(HMAC_SECRET)),
            Duration::from_secs(5),
        )
    }

    async fn status(&self) -> OrderStatus {
        self.repository
            .find_by_id(LocalOrderId::new(42))
            .await
            .unwrap()
            .unwrap()
            .status()
    }
}

async fn post_callback(app: Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn nested_callback(success: bool) -> Value {
    json!({
        "type": "TRANSACTION",
        "obj": {
            "id": 31393,
            "pending": false,
            "amount_cents": 13000,
            "success": success,
            "is_auth": false,
            "is_capture": false,
            "is_standalone_payment": true,
            "is_voided": false,
            "is_refunded": false,
            "is_3d_secure": false,
            "integration_id": 329,
            "has_parent_transaction": false,
            "order": {"id": REMOTE_ORDER, "merchant_order_id": "42"},
            "created_at": "2017-01-08T12:31:01.262405",
            "currency": "EGP",
            "error_occured": false,
            "owner": 180,
            "source_data": {"type": "card", "sub_type": "MasterCard", "pan": "2346"}
        }
    })
}

// =============================================================================
// Reconciliation
// =============================================================================

#[tokio::test]
async fn nested_successful_callback_marks_order_paid() {
    let fixture = Fixture::new();

    let (status, body) = post_callback(
        fixture.app(),
        PROCESSED_CALLBACK_PATH,
        nested_callback(true).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(fixture.status().await, OrderStatus::Paid);
    assert_eq!(fixture.hooks.calls(), vec![("succeeded", LocalOrderId::new(42))]);
}

#[tokio::test]
async fn flat_stringified_voided_callback_marks_order_voided() {
    let fixture = Fixture::new();
    let callback = json!({
        "id": "29187",
        "pending": "false",
        "success": "true",
        "is_voided": "true",
        "is_refunded": "false",
        "amount_cents": "13000",
        "order": REMOTE_ORDER.to_string(),
        "currency": "EGP"
    });

    let (status, _) =
        post_callback(fixture.app(), PROCESSED_CALLBACK_PATH, callback.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fixture.status().await, OrderStatus::Voided);
    assert_eq!(fixture.hooks.calls(), vec![("voided", LocalOrderId::new(42))]);
}

#[tokio::test]
async fn later_delivery_overwrites_earlier_status() {
    let fixture = Fixture::new();

    post_callback(
        fixture.app(),
        PROCESSED_CALLBACK_PATH,
        nested_callback(false).to_string(),
    )
    .await;
    assert_eq!(fixture.status().await, OrderStatus::Failed);

    post_callback(
        fixture.app(),
        PROCESSED_CALLBACK_PATH,
        nested_callback(true).to_string(),
    )
    .await;
    assert_eq!(fixture.status().await, OrderStatus::Paid);
    assert_eq!(fixture.hooks.calls().len(), 2);
}

// =============================================================================
// Acknowledged but dropped
// =============================================================================

#[tokio::test]
async fn malformed_body_is_acknowledged() {
    let fixture = Fixture::new();

    let (status, body) =
        post_callback(fixture.app(), PROCESSED_CALLBACK_PATH, "{not json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(fixture.status().await, OrderStatus::Pending);
    assert!(fixture.hooks.calls().is_empty());
}

#[tokio::test]
async fn unknown_remote_order_is_acknowledged() {
    let fixture = Fixture::new();
    let mut callback = nested_callback(true);
    callback["obj"]["order"] = json!({"id": 99999});

    let (status, body) =
        post_callback(fixture.app(), PROCESSED_CALLBACK_PATH, callback.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(fixture.status().await, OrderStatus::Pending);
    assert!(fixture.hooks.calls().is_empty());
}

#[tokio::test]
async fn token_callback_is_ignored() {
    let fixture = Fixture::new();
    let callback = json!({
        "type": "TOKEN",
        "obj": {"id": 2, "token": "e9ca4b4e", "masked_pan": "xxxx-xxxx-xxxx-2346", "order_id": REMOTE_ORDER}
    });

    let (status, _) =
        post_callback(fixture.app(), PROCESSED_CALLBACK_PATH, callback.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fixture.status().await, OrderStatus::Pending);
}

#[tokio::test]
async fn unavailable_repository_is_acknowledged() {
    let hooks = Arc::new(RecordingStatusHandler::default());
    let app = callback_app(
        CallbackAppState::new(Arc::new(UnavailableRepository), hooks.clone()),
        Duration::from_secs(5),
    );

    let (status, body) =
        post_callback(app, PROCESSED_CALLBACK_PATH, nested_callback(true).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert!(hooks.calls().is_empty());
}

// =============================================================================
// Slow reconciliation
// =============================================================================

#[tokio::test]
async fn slow_hook_within_timeout_completes_before_acknowledgement() {
    let fixture = Fixture::with_hooks(RecordingStatusHandler::slow(Duration::from_millis(100)));
    let app = callback_app(fixture.state(), Duration::from_secs(5));

    let (status, _) =
        post_callback(app, PROCESSED_CALLBACK_PATH, nested_callback(true).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fixture.hooks.calls(), vec![("succeeded", LocalOrderId::new(42))]);
}

#[tokio::test]
async fn slow_hook_past_timeout_is_acknowledged_and_still_runs() {
    let fixture = Fixture::with_hooks(RecordingStatusHandler::slow(Duration::from_millis(300)));
    let app = callback_app(fixture.state(), Duration::from_millis(50));

    let (status, body) =
        post_callback(app, PROCESSED_CALLBACK_PATH, nested_callback(true).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(fixture.status().await, OrderStatus::Paid);

    for _ in 0..40 {
        if !fixture.hooks.calls().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(fixture.hooks.calls(), vec![("succeeded", LocalOrderId::new(42))]);
}

// =============================================================================
// Signature verification
// =============================================================================

#[tokio::test]
async fn bad_signature_is_acknowledged_but_not_reconciled() {
    let fixture = Fixture::new();
    let uri = format!("{}?hmac={}", PROCESSED_CALLBACK_PATH, "ab".repeat(64));

    let (status, body) =
        post_callback(fixture.signed_app(), &uri, nested_callback(true).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(fixture.status().await, OrderStatus::Pending);
    assert!(fixture.hooks.calls().is_empty());
}

#[tokio::test]
async fn missing_signature_is_not_reconciled() {
    let fixture = Fixture::new();

    post_callback(
        fixture.signed_app(),
        PROCESSED_CALLBACK_PATH,
        nested_callback(true).to_string(),
    )
    .await;

    assert_eq!(fixture.status().await, OrderStatus::Pending);
}

#[tokio::test]
async fn valid_query_signature_is_reconciled() {
    let fixture = Fixture::new();
    let body = nested_callback(true).to_string();
    let hmac = CallbackSignature::new(HMAC_SECRET)
        .compute(&ProcessedCallback::parse(body.as_bytes()).unwrap())
        .unwrap();
    let uri = format!("{}?hmac={}", PROCESSED_CALLBACK_PATH, hmac);

    let (status, _) = post_callback(fixture.signed_app(), &uri, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fixture.status().await, OrderStatus::Paid);
}

#[tokio::test]
async fn valid_embedded_signature_is_reconciled() {
    let fixture = Fixture::new();
    let mut callback = nested_callback(true);
    let hmac = CallbackSignature::new(HMAC_SECRET)
        .compute(&ProcessedCallback::from_value(callback.clone()).unwrap())
        .unwrap();
    callback["hmac"] = json!(hmac);

    post_callback(fixture.signed_app(), PROCESSED_CALLBACK_PATH, callback.to_string()).await;

    assert_eq!(fixture.status().await, OrderStatus::Paid);
}
