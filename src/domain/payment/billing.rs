//! Billing data attached to a payment key.

use serde::{Serialize, Serializer};

/// Placeholder the gateway expects for billing fields the shop does not know.
pub const ABSENT_BILLING_FIELD: &str = "null";

/// Billing profile sent with a payment key request.
///
/// Every field is optional. Absent fields are sent as the string `"null"`,
/// never as JSON `null` or an omitted key; the gateway rejects both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillingData {
    #[serde(serialize_with = "or_null_literal")]
    pub email: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub first_name: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub last_name: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub phone_number: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub city: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub country: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub street: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub building: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub floor: Option<String>,
    #[serde(serialize_with = "or_null_literal")]
    pub apartment: Option<String>,
}

impl BillingData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

fn or_null_literal<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(ABSENT_BILLING_FIELD))
}
