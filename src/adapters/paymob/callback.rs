//! Processed-callback payload parsing.
//!
//! Two payload shapes are delivered to the same endpoint:
//!
//! ```text
//! {"type": "TRANSACTION", "obj": {"id": 31393, "success": true, "order": {"id": 59619}, ...}}
//! {"id": "29187", "success": "true", "is_voided": "false", "order": "56081", ...}
//! ```
//!
//! The first nests the transaction under `obj` and uses real JSON types; the
//! second is flat and stringifies every scalar. Flags are looked up on the
//! transaction object first and then on the root.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::{lenient, RemoteOrderId, TransactionId};
use crate::domain::order::{PaymentOutcome, TransactionFlags};

const TRANSACTION_KIND: &str = "TRANSACTION";

/// Errors while decoding a callback body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Callback body is not a JSON object")]
    NotAnObject,
}

/// A decoded processed callback.
#[derive(Debug, Clone)]
pub struct ProcessedCallback {
    kind: Option<String>,
    transaction_id: Option<TransactionId>,
    remote_order_id: Option<RemoteOrderId>,
    flags: TransactionFlags,
    hmac: Option<String>,
    transaction: Map<String, Value>,
}

impl ProcessedCallback {
    /// Decodes a raw callback body.
    pub fn parse(body: &[u8]) -> Result<Self, CallbackError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| CallbackError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decodes an already parsed callback body.
    pub fn from_value(value: Value) -> Result<Self, CallbackError> {
        let Value::Object(root) = value else {
            return Err(CallbackError::NotAnObject);
        };

        let transaction = match root.get("obj") {
            Some(Value::Object(obj)) => obj.clone(),
            _ => root.clone(),
        };

        let lookup = |key: &str| transaction.get(key).or_else(|| root.get(key));
        let flag = |key: &str| lookup(key).map(lenient::truthy).unwrap_or(false);

        let flags = TransactionFlags::new(flag("success"), flag("is_voided"), flag("is_refunded"));

        let remote_order_id = lookup("order")
            .and_then(|order| match order {
                Value::Object(order) => order.get("id").and_then(lenient::as_u64),
                scalar => lenient::as_u64(scalar),
            })
            .map(RemoteOrderId::new);

        let transaction_id = transaction
            .get("id")
            .and_then(lenient::as_u64)
            .map(TransactionId::new);

        let kind = root
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string);

        let hmac = lookup("hmac").and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            kind,
            transaction_id,
            remote_order_id,
            flags,
            hmac,
            transaction,
        })
    }

    /// True unless the callback declares a non-transaction type
    /// (for example a saved card token notification).
    pub fn is_transaction(&self) -> bool {
        self.kind
            .as_deref()
            .map_or(true, |kind| kind.eq_ignore_ascii_case(TRANSACTION_KIND))
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn remote_order_id(&self) -> Option<RemoteOrderId> {
        self.remote_order_id
    }

    pub fn flags(&self) -> TransactionFlags {
        self.flags
    }

    pub fn outcome(&self) -> PaymentOutcome {
        PaymentOutcome::resolve(self.flags)
    }

    /// Signature embedded in the body, if any.
    pub fn hmac(&self) -> Option<&str> {
        self.hmac.as_deref()
    }

    /// The transaction object the flags were read from.
    pub fn transaction(&self) -> &Map<String, Value> {
        &self.transaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_variant_with_real_booleans() {
        let callback = ProcessedCallback::from_value(json!({
            "type": "TRANSACTION",
            "obj": {
                "id": 31393,
                "success": true,
                "is_voided": false,
                "is_refunded": false,
                "order": {"id": 68010}
            }
        }))
        .unwrap();

        assert!(callback.is_transaction());
        assert_eq!(callback.transaction_id(), Some(TransactionId::new(31393)));
        assert_eq!(callback.remote_order_id(), Some(RemoteOrderId::new(68010)));
        assert_eq!(callback.flags(), TransactionFlags::new(true, false, false));
        assert_eq!(callback.outcome(), PaymentOutcome::Succeeded);
    }

    #[test]
    fn parses_flat_variant_with_string_booleans() {
        let callback = ProcessedCallback::from_value(json!({
            "success": "true",
            "is_voided": "true",
            "is_refunded": "false"
        }))
        .unwrap();

        assert_eq!(callback.flags(), TransactionFlags::new(true, true, false));
        assert_eq!(callback.outcome(), PaymentOutcome::Voided);
        assert_eq!(callback.remote_order_id(), None);
    }

    #[test]
    fn flat_variant_reads_scalar_order_id() {
        let callback = ProcessedCallback::from_value(json!({
            "id": "29187",
            "success": "true",
            "order": "56081",
            "hmac": "653c9ce5"
        }))
        .unwrap();

        assert_eq!(callback.remote_order_id(), Some(RemoteOrderId::new(56081)));
        assert_eq!(callback.transaction_id(), Some(TransactionId::new(29187)));
        assert_eq!(callback.hmac(), Some("653c9ce5"));
    }

    #[test]
    fn flags_fall_back_to_root_when_missing_from_obj() {
        let callback = ProcessedCallback::from_value(json!({
            "success": "true",
            "is_refunded": "true",
            "obj": {"id": 1, "order": {"id": 2}}
        }))
        .unwrap();

        assert_eq!(callback.outcome(), PaymentOutcome::Refunded);
    }

    #[test]
    fn obj_flags_take_precedence_over_root() {
        let callback = ProcessedCallback::from_value(json!({
            "success": "false",
            "obj": {"success": true}
        }))
        .unwrap();

        assert!(callback.flags().success);
    }

    #[test]
    fn missing_flags_resolve_to_failed() {
        let callback = ProcessedCallback::from_value(json!({"obj": {}})).unwrap();
        assert_eq!(callback.outcome(), PaymentOutcome::Failed);
    }

    #[test]
    fn non_transaction_type_is_flagged() {
        let callback = ProcessedCallback::from_value(json!({
            "type": "TOKEN",
            "obj": {"token": "abc"}
        }))
        .unwrap();

        assert!(!callback.is_transaction());
        assert_eq!(callback.kind(), Some("TOKEN"));
    }

    #[test]
    fn rejects_invalid_json() {
        let result = ProcessedCallback::parse(b"not json");
        assert!(matches!(result, Err(CallbackError::InvalidJson(_))));
    }

    #[test]
    fn rejects_non_object_body() {
        let result = ProcessedCallback::parse(b"[1, 2, 3]");
        assert_eq!(result.unwrap_err(), CallbackError::NotAnObject);
    }
}
