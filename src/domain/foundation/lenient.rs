//! Lenient coercion of gateway JSON values.
//!
//! The gateway is inconsistent about scalar types: the same field may arrive
//! as a JSON boolean in one payload and as `"true"` in another, and ids are
//! sent both as numbers and as numeric strings. These helpers accept every
//! observed representation and are usable as `#[serde(deserialize_with)]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interprets a JSON value as a boolean flag.
///
/// True for JSON `true`, the number `1`, and the strings `1`, `true`, `on`,
/// `yes` (case-insensitive, surrounding whitespace ignored). Everything else,
/// including `null`, is false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Reads an unsigned integer from a number or a numeric string.
pub fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a signed integer from a number or a numeric string.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Renders a scalar as the string the gateway would have sent.
///
/// Strings are returned verbatim, booleans as `true`/`false`, numbers in
/// their JSON form. `null`, arrays and objects yield `None`.
pub fn as_plain_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `deserialize_with` adapter for [`truthy`].
pub fn bool_from_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(truthy(&value))
}

/// `deserialize_with` adapter for unsigned integers sent as numbers or strings.
pub fn u64_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    as_u64(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("expected an unsigned integer, got {}", value))
    })
}

/// `deserialize_with` adapter for signed integers sent as numbers or strings.
/// Missing or `null` values become `0`.
pub fn i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0);
    }
    as_i64(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {}", value)))
}

/// `deserialize_with` adapter for optional text that may arrive as a number.
pub fn opt_string_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_plain_string(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthy_accepts_real_booleans() {
        assert!(truthy(&json!(true)));
        assert!(!truthy(&json!(false)));
    }

    #[test]
    fn truthy_accepts_stringified_booleans() {
        assert!(truthy(&json!("true")));
        assert!(truthy(&json!("TRUE")));
        assert!(truthy(&json!(" yes ")));
        assert!(truthy(&json!("on")));
        assert!(truthy(&json!("1")));
        assert!(!truthy(&json!("false")));
        assert!(!truthy(&json!("no")));
        assert!(!truthy(&json!("")));
    }

    #[test]
    fn truthy_treats_numbers_and_null() {
        assert!(truthy(&json!(1)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(2)));
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!({"success": true})));
    }

    #[test]
    fn as_u64_reads_numbers_and_numeric_strings() {
        assert_eq!(as_u64(&json!(68010)), Some(68010));
        assert_eq!(as_u64(&json!("56081")), Some(56081));
        assert_eq!(as_u64(&json!("abc")), None);
        assert_eq!(as_u64(&json!(-5)), None);
    }

    #[test]
    fn as_plain_string_renders_scalars() {
        assert_eq!(as_plain_string(&json!("EGP")), Some("EGP".to_string()));
        assert_eq!(as_plain_string(&json!(false)), Some("false".to_string()));
        assert_eq!(as_plain_string(&json!(20000)), Some("20000".to_string()));
        assert_eq!(as_plain_string(&Value::Null), None);
    }

    #[derive(Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "bool_from_any")]
        success: bool,
        #[serde(default, deserialize_with = "i64_from_any")]
        amount_cents: i64,
        #[serde(default, deserialize_with = "opt_string_from_any")]
        merchant_order_id: Option<String>,
    }

    #[test]
    fn deserialize_adapters_accept_mixed_representations() {
        let flags: Flags = serde_json::from_value(json!({
            "success": "true",
            "amount_cents": "20000",
            "merchant_order_id": 60019
        }))
        .unwrap();

        assert!(flags.success);
        assert_eq!(flags.amount_cents, 20000);
        assert_eq!(flags.merchant_order_id.as_deref(), Some("60019"));
    }

    #[test]
    fn deserialize_adapters_default_missing_fields() {
        let flags: Flags = serde_json::from_value(json!({})).unwrap();
        assert!(!flags.success);
        assert_eq!(flags.amount_cents, 0);
        assert_eq!(flags.merchant_order_id, None);
    }
}
