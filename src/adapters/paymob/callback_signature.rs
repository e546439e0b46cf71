//! Processed-callback HMAC verification.
//!
//! The gateway signs a processed callback with HMAC-SHA512 over the
//! concatenated values of a fixed list of transaction fields, in
//! lexicographic key order, keyed with the merchant's HMAC secret.
//!
//! # Security
//!
//! - Signatures are compared in constant time
//! - The secret is held as a `secrecy::SecretString`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::domain::foundation::lenient;

use super::callback::ProcessedCallback;

type HmacSha512 = Hmac<Sha512>;

/// Signed fields as `(nested path, flat key)`.
///
/// The nested path applies to the `obj` payload; the flat key to the
/// stringified variant where nested objects are flattened with `_`.
const SIGNED_FIELDS: [(&str, &str); 20] = [
    ("amount_cents", "amount_cents"),
    ("created_at", "created_at"),
    ("currency", "currency"),
    ("error_occured", "error_occured"),
    ("has_parent_transaction", "has_parent_transaction"),
    ("id", "id"),
    ("integration_id", "integration_id"),
    ("is_3d_secure", "is_3d_secure"),
    ("is_auth", "is_auth"),
    ("is_capture", "is_capture"),
    ("is_refunded", "is_refunded"),
    ("is_standalone_payment", "is_standalone_payment"),
    ("is_voided", "is_voided"),
    ("order.id", "order"),
    ("owner", "owner"),
    ("pending", "pending"),
    ("source_data.pan", "source_data_pan"),
    ("source_data.sub_type", "source_data_sub_type"),
    ("source_data.type", "source_data_type"),
    ("success", "success"),
];

/// Errors from callback signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Callback carries no hmac")]
    Missing,

    #[error("Callback hmac is not valid hex")]
    InvalidFormat,

    #[error("Callback hmac does not match")]
    Mismatch,

    #[error("HMAC secret cannot be used as a key")]
    InvalidKey,
}

/// Verifier for processed-callback signatures.
#[derive(Clone)]
pub struct CallbackSignature {
    secret: SecretString,
}

impl CallbackSignature {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Computes the lowercase hex signature for a callback.
    pub fn compute(&self, callback: &ProcessedCallback) -> Result<String, SignatureError> {
        Ok(hex_encode(&self.digest(callback)?))
    }

    /// Verifies `provided`, falling back to the hmac embedded in the body.
    pub fn verify(
        &self,
        callback: &ProcessedCallback,
        provided: Option<&str>,
    ) -> Result<(), SignatureError> {
        let provided = provided
            .or_else(|| callback.hmac())
            .ok_or(SignatureError::Missing)?;
        let provided = hex_decode(provided.trim()).ok_or(SignatureError::InvalidFormat)?;

        let expected = self.digest(callback)?;

        if expected.as_slice().ct_eq(provided.as_slice()).unwrap_u8() != 1 {
            tracing::warn!(
                transaction_id = ?callback.transaction_id(),
                "Processed callback signature mismatch"
            );
            return Err(SignatureError::Mismatch);
        }

        Ok(())
    }

    fn digest(&self, callback: &ProcessedCallback) -> Result<Vec<u8>, SignatureError> {
        let mut mac = HmacSha512::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| SignatureError::InvalidKey)?;
        mac.update(signed_payload(callback.transaction()).as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Concatenates the signed field values. Missing fields contribute nothing.
fn signed_payload(transaction: &Map<String, Value>) -> String {
    SIGNED_FIELDS
        .iter()
        .filter_map(|(path, flat)| field_value(transaction, path, flat))
        .collect()
}

fn field_value(transaction: &Map<String, Value>, path: &str, flat: &str) -> Option<String> {
    let nested = match path.split_once('.') {
        Some((parent, child)) => match transaction.get(parent) {
            Some(Value::Object(inner)) => inner.get(child),
            _ => None,
        },
        None => transaction.get(path),
    };

    nested
        .or_else(|| transaction.get(flat))
        .and_then(lenient::as_plain_string)
}

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_callback() -> ProcessedCallback {
        ProcessedCallback::from_value(json!({
            "type": "TRANSACTION",
            "obj": {
                "id": 31393,
                "pending": false,
                "amount_cents": 130,
                "success": true,
                "is_auth": false,
                "is_capture": true,
                "is_standalone_payment": false,
                "is_voided": false,
                "is_refunded": false,
                "is_3d_secure": false,
                "integration_id": 329,
                "has_parent_transaction": true,
                "order": {"id": 59619},
                "created_at": "2017-09-19T02:21:21.017215",
                "currency": "EGP",
                "source_data": {"pan": "8769", "type": "card", "sub_type": "Visa"},
                "error_occured": false,
                "owner": 197
            }
        }))
        .unwrap()
    }

    fn flat_callback(hmac: &str) -> ProcessedCallback {
        ProcessedCallback::from_value(json!({
            "id": "31393",
            "pending": "false",
            "amount_cents": "130",
            "success": "true",
            "is_auth": "false",
            "is_capture": "true",
            "is_standalone_payment": "false",
            "is_voided": "false",
            "is_refunded": "false",
            "is_3d_secure": "false",
            "integration_id": "329",
            "has_parent_transaction": "true",
            "order": "59619",
            "created_at": "2017-09-19T02:21:21.017215",
            "currency": "EGP",
            "source_data_pan": "8769",
            "source_data_type": "card",
            "source_data_sub_type": "Visa",
            "error_occured": "false",
            "owner": "197",
            "hmac": hmac
        }))
        .unwrap()
    }

    #[test]
    fn signed_payload_concatenates_in_field_order() {
        let payload = signed_payload(nested_callback().transaction());
        assert_eq!(
            payload,
            "1302017-09-19T02:21:21.017215EGPfalsetrue31393329falsefalsetruefalsefalsefalse\
             59619197false8769Visacardtrue"
        );
    }

    #[test]
    fn nested_and_flat_variants_sign_identically() {
        let signature = CallbackSignature::new("secret");
        let nested = signature.compute(&nested_callback()).unwrap();
        let flat = signature.compute(&flat_callback("")).unwrap();
        assert_eq!(nested, flat);
        assert_eq!(nested.len(), 128);
    }

    #[test]
    fn verify_accepts_matching_query_hmac() {
        let signature = CallbackSignature::new("secret");
        let callback = nested_callback();
        let hmac = signature.compute(&callback).unwrap();

        assert!(signature.verify(&callback, Some(&hmac)).is_ok());
    }

    #[test]
    fn verify_accepts_uppercase_hex() {
        let signature = CallbackSignature::new("secret");
        let callback = nested_callback();
        let hmac = signature.compute(&callback).unwrap().to_uppercase();

        assert!(signature.verify(&callback, Some(&hmac)).is_ok());
    }

    #[test]
    fn verify_falls_back_to_body_hmac() {
        let signature = CallbackSignature::new("secret");
        let hmac = signature.compute(&flat_callback("")).unwrap();
        let callback = flat_callback(&hmac);

        assert!(signature.verify(&callback, None).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let callback = nested_callback();
        let hmac = CallbackSignature::new("other").compute(&callback).unwrap();

        let result = CallbackSignature::new("secret").verify(&callback, Some(&hmac));
        assert_eq!(result, Err(SignatureError::Mismatch));
    }

    #[test]
    fn verify_rejects_missing_hmac() {
        let result = CallbackSignature::new("secret").verify(&nested_callback(), None);
        assert_eq!(result, Err(SignatureError::Missing));
    }

    #[test]
    fn verify_rejects_non_hex_hmac() {
        let result = CallbackSignature::new("secret").verify(&nested_callback(), Some("zz"));
        assert_eq!(result, Err(SignatureError::InvalidFormat));
    }

    #[test]
    fn hex_roundtrip() {
        let bytes = vec![0xde, 0xad, 0xbe, 0xef];
        assert_eq!(hex_encode(&bytes), "deadbeef");
        assert_eq!(hex_decode("DEADBEEF"), Some(bytes));
        assert_eq!(hex_decode("abc"), None);
    }
}
