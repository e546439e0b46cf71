//! Paymob Accept gateway adapter.
//!
//! Implements the `PaymentGateway` port over the Accept REST API and decodes
//! the processed callbacks the gateway posts back, including:
//! - Authentication, order registration and payment keys
//! - Direct card payments and captures
//! - Order and transaction queries
//! - Processed-callback parsing and HMAC-SHA512 verification
//!
//! # Security
//!
//! - Callback signatures are compared in constant time
//! - Credentials, tokens and card data are held as `secrecy::SecretString`

mod callback;
mod callback_signature;
mod mock_payment_gateway;
mod paymob_client;
mod wire_types;

pub use callback::{CallbackError, ProcessedCallback};
pub use callback_signature::{CallbackSignature, SignatureError};
pub use mock_payment_gateway::{approved_transaction, MethodCall, MockPaymentGateway, MOCK_TOKEN};
pub use paymob_client::{
    PaymobClient, PaymobClientConfig, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT,
};
pub use wire_types::{GatewayReply, DUPLICATE_MESSAGE};
