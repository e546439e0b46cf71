//! Request bodies and reply classification for the gateway REST API.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{lenient, MerchantId, RemoteOrderId, TransactionId};
use crate::domain::payment::BillingData;
use crate::ports::{
    CardPaymentRequest, CreateOrderRequest, Credentials, GatewayError, PaymentKeyRequest,
    PaymentKeyToken,
};

/// Sentinel `message` the gateway returns for a reused merchant order id.
pub const DUPLICATE_MESSAGE: &str = "duplicate";

/// Card source subtype for direct card payments.
const CARD_SUBTYPE: &str = "CARD";

// ════════════════════════════════════════════════════════════════════════════════
// Request bodies
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct AuthBody<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for AuthBody<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderBody<'a> {
    pub merchant_id: MerchantId,
    pub amount_cents: u64,
    pub merchant_order_id: &'a str,
    pub currency: &'a str,
    pub notify_user_with_email: bool,
}

impl<'a> From<&'a CreateOrderRequest> for OrderBody<'a> {
    fn from(request: &'a CreateOrderRequest) -> Self {
        Self {
            merchant_id: request.merchant_id,
            amount_cents: request.amount_cents,
            merchant_order_id: &request.merchant_order_id,
            currency: &request.currency,
            notify_user_with_email: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentKeyBody<'a> {
    pub amount_cents: u64,
    pub expiration: u64,
    pub order_id: RemoteOrderId,
    pub billing_data: &'a BillingData,
    pub currency: &'a str,
    pub card_integration_id: u64,
}

impl<'a> From<&'a PaymentKeyRequest> for PaymentKeyBody<'a> {
    fn from(request: &'a PaymentKeyRequest) -> Self {
        Self {
            amount_cents: request.amount_cents,
            expiration: request.expiration_secs,
            order_id: request.order_id,
            billing_data: &request.billing,
            currency: &request.currency,
            card_integration_id: request.integration_id,
        }
    }
}

#[derive(Serialize)]
pub struct PayBody<'a> {
    pub source: CardSource<'a>,
    pub billing: PayerBilling<'a>,
    pub payment_token: &'a str,
}

#[derive(Serialize)]
pub struct CardSource<'a> {
    pub identifier: &'a str,
    pub sourceholder_name: &'a str,
    pub subtype: &'static str,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvn: &'a str,
}

#[derive(Serialize)]
pub struct PayerBilling<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
}

impl<'a> From<&'a CardPaymentRequest> for PayBody<'a> {
    fn from(request: &'a CardPaymentRequest) -> Self {
        let card = &request.card;
        Self {
            source: CardSource {
                identifier: card.number().expose_secret(),
                sourceholder_name: card.holder_name(),
                subtype: CARD_SUBTYPE,
                expiry_month: format!("{:02}", card.expiry_month()),
                expiry_year: card.expiry_year().to_string(),
                cvn: card.cvn().expose_secret(),
            },
            billing: PayerBilling {
                first_name: &request.payer.first_name,
                last_name: &request.payer.last_name,
                email: &request.payer.email,
                phone_number: &request.payer.phone_number,
            },
            payment_token: request.payment_key.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaptureBody {
    pub transaction_id: TransactionId,
    pub amount_cents: u64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentKeyReply {
    pub token: PaymentKeyToken,
}

// ════════════════════════════════════════════════════════════════════════════════
// Reply classification
// ════════════════════════════════════════════════════════════════════════════════

/// A gateway reply after sentinel detection.
///
/// The gateway signals failures in the body rather than consistently through
/// the status code, so every reply is classified before typed decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReply {
    /// A 2xx JSON body with no failure sentinel.
    Success(Value),

    /// The body carries a `detail` field.
    AuthenticationFailed { detail: String },

    /// The body carries `message == "duplicate"`.
    Duplicate,

    /// Non-2xx JSON body with no known sentinel.
    Rejected { status: u16, message: String },
}

impl GatewayReply {
    /// Classifies a raw reply.
    ///
    /// # Errors
    ///
    /// `Transport` when the body is not JSON.
    pub fn classify(status: u16, body: &[u8]) -> Result<Self, GatewayError> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            GatewayError::Transport(format!(
                "status {} with non-JSON body: {}",
                status, e
            ))
        })?;

        if let Some(detail) = value.get("detail") {
            let detail = lenient::as_plain_string(detail).unwrap_or_else(|| detail.to_string());
            return Ok(GatewayReply::AuthenticationFailed { detail });
        }

        if value.get("message").and_then(Value::as_str) == Some(DUPLICATE_MESSAGE) {
            return Ok(GatewayReply::Duplicate);
        }

        if !(200..300).contains(&status) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            return Ok(GatewayReply::Rejected { status, message });
        }

        Ok(GatewayReply::Success(value))
    }

    /// Decodes a success body as `T` or converts the failure to an error.
    ///
    /// `merchant_order_id` names the id reported in `DuplicateOrder`.
    pub fn into_result<T>(self, merchant_order_id: Option<&str>) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
    {
        match self {
            GatewayReply::Success(value) => serde_json::from_value(value)
                .map_err(|e| GatewayError::InvalidResponse(e.to_string())),
            GatewayReply::AuthenticationFailed { detail } => {
                Err(GatewayError::AuthenticationFailed { detail })
            }
            GatewayReply::Duplicate => Err(GatewayError::DuplicateOrder {
                merchant_order_id: merchant_order_id.unwrap_or_default().to_string(),
            }),
            GatewayReply::Rejected { status, message } => {
                Err(GatewayError::Rejected { status, message })
            }
        }
    }
}
