//! Payment gateway port.
//!
//! Defines the contract for the remote payment gateway. One operation per
//! remote endpoint; implementations issue exactly one request per call and
//! never retry.
//!
//! # Design
//!
//! - **Typed replies**: gateway failure sentinels (`detail`, `"duplicate"`)
//!   surface as [`GatewayError`] variants instead of fields to probe for
//! - **Open responses**: every response type keeps unrecognised fields in an
//!   `extra` map, since the gateway's schemas are not versioned
//! - **Lenient scalars**: ids, amounts and flags accept numbers, booleans and
//!   their stringified forms

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{
    lenient, MerchantId, RemoteOrderId, TransactionId, ValidationError,
};
use crate::domain::order::{PaymentOutcome, TransactionFlags};
use crate::domain::payment::{BillingData, CardDetails, PayerDetails};

/// Port for the remote payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Exchange merchant credentials for a short-lived API token.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailed` when the gateway answers with a `detail`
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authentication, GatewayError>;

    /// Register an order with the gateway.
    ///
    /// # Errors
    ///
    /// - `DuplicateOrder` when `merchant_order_id` was used before
    async fn create_order(
        &self,
        token: &GatewayToken,
        request: CreateOrderRequest,
    ) -> Result<RemoteOrder, GatewayError>;

    /// Request a payment key for a registered order and billing profile.
    async fn request_payment_key(
        &self,
        token: &GatewayToken,
        request: PaymentKeyRequest,
    ) -> Result<PaymentKeyToken, GatewayError>;

    /// Pay a payment key with card details. Authorised by the payment key,
    /// not by an API token.
    async fn submit_payment(&self, request: CardPaymentRequest) -> Result<Transaction, GatewayError>;

    /// Capture a previously authorised transaction.
    async fn capture(
        &self,
        token: &GatewayToken,
        transaction_id: TransactionId,
        amount_cents: u64,
    ) -> Result<Transaction, GatewayError>;

    /// List gateway orders, one page at a time (pages start at 1).
    async fn list_orders(
        &self,
        token: &GatewayToken,
        page: u32,
    ) -> Result<Page<RemoteOrder>, GatewayError>;

    /// Fetch a single gateway order.
    async fn get_order(
        &self,
        token: &GatewayToken,
        order_id: RemoteOrderId,
    ) -> Result<RemoteOrder, GatewayError>;

    /// List transactions, one page at a time (pages start at 1).
    async fn list_transactions(
        &self,
        token: &GatewayToken,
        page: u32,
    ) -> Result<Page<Transaction>, GatewayError>;

    /// Fetch a single transaction.
    async fn get_transaction(
        &self,
        token: &GatewayToken,
        transaction_id: TransactionId,
    ) -> Result<Transaction, GatewayError>;
}

// ════════════════════════════════════════════════════════════════════════════════
// Credentials and tokens
// ════════════════════════════════════════════════════════════════════════════════

/// Merchant dashboard credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
        }
    }
}

/// API bearer token returned by authentication.
///
/// Sent as the `token` query parameter, never as a header.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct GatewayToken(SecretString);

impl GatewayToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for GatewayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GatewayToken([REDACTED])")
    }
}

/// Token scoped to one gateway order and billing profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PaymentKeyToken(String);

impl PaymentKeyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentKeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Request to register an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub merchant_id: MerchantId,
    pub amount_cents: u64,
    /// Must be unique across the merchant's gateway history.
    pub merchant_order_id: String,
    pub currency: String,
}

/// Request for a payment key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentKeyRequest {
    pub amount_cents: u64,
    pub order_id: RemoteOrderId,
    pub billing: BillingData,
    pub currency: String,
    pub integration_id: u64,
    /// Nominal lifetime of the key, enforced by the gateway only.
    pub expiration_secs: u64,
}

/// Direct card payment against a payment key.
#[derive(Debug, Clone)]
pub struct CardPaymentRequest {
    pub payment_key: PaymentKeyToken,
    pub card: CardDetails,
    pub payer: PayerDetails,
    /// Gateway order the key was issued for. Used for correlation in logs;
    /// the gateway derives it from the key.
    pub order_id: RemoteOrderId,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Successful authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct Authentication {
    pub token: GatewayToken,
    pub profile: MerchantProfile,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Merchant profile attached to an authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantProfile {
    pub id: MerchantId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order as registered on the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    pub id: RemoteOrderId,
    #[serde(default, deserialize_with = "lenient::opt_string_from_any")]
    pub merchant_order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::i64_from_any")]
    pub amount_cents: i64,
    #[serde(default, deserialize_with = "lenient::i64_from_any")]
    pub paid_amount_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a payment attempt or capture.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default, deserialize_with = "lenient::bool_from_any")]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient::bool_from_any")]
    pub pending: bool,
    #[serde(default, deserialize_with = "lenient::bool_from_any")]
    pub is_auth: bool,
    #[serde(default, deserialize_with = "lenient::bool_from_any")]
    pub is_capture: bool,
    #[serde(default, deserialize_with = "lenient::bool_from_any")]
    pub is_voided: bool,
    #[serde(default, deserialize_with = "lenient::bool_from_any")]
    pub is_refunded: bool,
    #[serde(default, deserialize_with = "lenient::bool_from_any")]
    pub is_3d_secure: bool,
    #[serde(default, deserialize_with = "lenient::i64_from_any")]
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Gateway order, sent either as a bare id or as the full order object.
    #[serde(default, deserialize_with = "order_reference")]
    pub order: Option<RemoteOrderId>,
    #[serde(default)]
    pub source_data: Option<SourceData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    pub fn flags(&self) -> TransactionFlags {
        TransactionFlags::new(self.success, self.is_voided, self.is_refunded)
    }

    pub fn outcome(&self) -> PaymentOutcome {
        PaymentOutcome::resolve(self.flags())
    }
}

/// Payment source summary.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceData {
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub sub_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string_from_any")]
    pub pan: Option<String>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn order_reference<'de, D>(deserializer: D) -> Result<Option<RemoteOrderId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match &value {
        Value::Object(order) => order.get("id").and_then(lenient::as_u64),
        other => lenient::as_u64(other),
    };
    Ok(id.map(RemoteOrderId::new))
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Errors from gateway operations. None are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The gateway answered with a `detail` field.
    #[error("Gateway authentication failed: {detail}")]
    AuthenticationFailed { detail: String },

    /// The merchant order id was already registered.
    #[error("Merchant order id {merchant_order_id} is a duplicate")]
    DuplicateOrder { merchant_order_id: String },

    /// Network failure, timeout, or a body that is not JSON.
    #[error("Gateway transport error: {0}")]
    Transport(String),

    /// Caller-supplied fields failed local checks.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// Non-success status with a JSON body carrying no known sentinel.
    #[error("Gateway rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Success status but the body did not match the expected shape.
    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Short machine-readable kind, for logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::AuthenticationFailed { .. } => "authentication_failed",
            GatewayError::DuplicateOrder { .. } => "duplicate_order",
            GatewayError::Transport(_) => "transport_error",
            GatewayError::Validation(_) => "validation_error",
            GatewayError::Rejected { .. } => "rejected",
            GatewayError::InvalidResponse(_) => "invalid_response",
        }
    }
}
