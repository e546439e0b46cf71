//! HTTP DTOs for the processed-callback endpoint.

use serde::{Deserialize, Serialize};

/// Query string of a processed callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    /// Signature of the transaction fields, hex encoded.
    #[serde(default)]
    pub hmac: Option<String>,
}

/// Acknowledgement body. Always `{"success": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

impl AckResponse {
    pub fn ack() -> Self {
        Self { success: true }
    }
}
