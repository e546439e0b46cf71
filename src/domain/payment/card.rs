//! Card and payer details for direct card payments.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::domain::foundation::ValidationError;

const CARD_NUMBER_DIGITS: usize = 16;
const CVN_DIGITS: usize = 3;
const MAX_HOLDER_NAME_LEN: usize = 255;

/// Validated card details.
///
/// The card number and CVN are secrets: they are redacted from `Debug`
/// output and only exposed when the payment request is built.
#[derive(Clone)]
pub struct CardDetails {
    number: SecretString,
    holder_name: String,
    expiry_month: u8,
    expiry_year: u16,
    cvn: SecretString,
}

impl CardDetails {
    /// Validates and builds card details.
    ///
    /// # Errors
    ///
    /// - `card_number` must be exactly 16 ASCII digits
    /// - `card_holdername` must be non-blank and at most 255 characters
    /// - `card_expiry_mm` must be in `1..=12`
    /// - `card_cvn` must be exactly 3 ASCII digits
    pub fn new(
        number: &str,
        holder_name: &str,
        expiry_month: u8,
        expiry_year: u16,
        cvn: &str,
    ) -> Result<Self, ValidationError> {
        let number = number.trim();
        if !is_digits(number, CARD_NUMBER_DIGITS) {
            return Err(ValidationError::invalid_format(
                "card_number",
                format!("must be {} digits", CARD_NUMBER_DIGITS),
            ));
        }

        let holder_name = holder_name.trim();
        if holder_name.is_empty() {
            return Err(ValidationError::empty_field("card_holdername"));
        }
        if holder_name.chars().count() > MAX_HOLDER_NAME_LEN {
            return Err(ValidationError::out_of_range(
                "card_holdername",
                1,
                MAX_HOLDER_NAME_LEN as i64,
                holder_name.chars().count() as i64,
            ));
        }

        if !(1..=12).contains(&expiry_month) {
            return Err(ValidationError::out_of_range(
                "card_expiry_mm",
                1,
                12,
                expiry_month as i64,
            ));
        }

        let cvn = cvn.trim();
        if !is_digits(cvn, CVN_DIGITS) {
            return Err(ValidationError::invalid_format(
                "card_cvn",
                format!("must be {} digits", CVN_DIGITS),
            ));
        }

        Ok(Self {
            number: SecretString::new(number.to_string()),
            holder_name: holder_name.to_string(),
            expiry_month,
            expiry_year,
            cvn: SecretString::new(cvn.to_string()),
        })
    }

    pub fn number(&self) -> &SecretString {
        &self.number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn expiry_month(&self) -> u8 {
        self.expiry_month
    }

    pub fn expiry_year(&self) -> u16 {
        self.expiry_year
    }

    pub fn cvn(&self) -> &SecretString {
        &self.cvn
    }

    /// Last four digits, safe for logs.
    pub fn last_four(&self) -> &str {
        let number = self.number.expose_secret();
        &number[number.len() - 4..]
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("************{}", self.last_four()))
            .field("holder_name", &self.holder_name)
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvn", &"***")
            .finish()
    }
}

/// Payer contact details sent as the billing block of a card payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl PayerDetails {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}
