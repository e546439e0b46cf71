//! Paymob Accept REST client.
//!
//! Implements the `PaymentGateway` port over the gateway's JSON API.
//!
//! # Security
//!
//! - The API token travels as the `token` query parameter and is never logged
//! - Card number and CVN are exposed only while the request body is serialized
//!
//! # Configuration
//!
//! ```ignore
//! let config = PaymobClientConfig::new().with_timeout(Duration::from_secs(10));
//! let client = PaymobClient::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::foundation::{RemoteOrderId, TransactionId};
use crate::ports::{
    Authentication, CardPaymentRequest, CreateOrderRequest, Credentials, GatewayError,
    GatewayToken, Page, PaymentGateway, PaymentKeyRequest, PaymentKeyToken, RemoteOrder,
    Transaction,
};

use super::wire_types::{
    AuthBody, CaptureBody, GatewayReply, OrderBody, PayBody, PaymentKeyBody, PaymentKeyReply,
};

/// Production API host.
pub const DEFAULT_API_BASE_URL: &str = "https://accept.paymobsolutions.com";

/// Per-request timeout when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct PaymobClientConfig {
    /// Base URL for the gateway (default: https://accept.paymobsolutions.com).
    api_base_url: String,

    /// Timeout applied to every request.
    request_timeout: Duration,
}

impl Default for PaymobClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl PaymobClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom API base URL (for testing). A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

/// Paymob Accept gateway client.
///
/// Issues exactly one request per port call and never retries.
pub struct PaymobClient {
    config: PaymobClientConfig,
    http_client: reqwest::Client,
}

impl PaymobClient {
    /// Create a client with the given configuration.
    ///
    /// # Errors
    ///
    /// `Transport` when the HTTP client cannot be initialised.
    pub fn new(config: PaymobClientConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &PaymobClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    async fn post<B, T>(
        &self,
        operation: &'static str,
        path: &str,
        token: Option<&GatewayToken>,
        body: &B,
        merchant_order_id: Option<&str>,
    ) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http_client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.query(&[("token", token.expose())]);
        }

        self.execute(operation, request, merchant_order_id).await
    }

    async fn get<T>(
        &self,
        operation: &'static str,
        path: &str,
        token: &GatewayToken,
        page: Option<u32>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let mut request = self.http_client.get(self.url(path));
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        request = request.query(&[("token", token.expose())]);

        self.execute(operation, request, None).await
    }

    async fn execute<T>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
        merchant_order_id: Option<&str>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Paymob request failed");
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            tracing::error!(operation, status, error = %e, "Failed to read Paymob response");
            GatewayError::Transport(e.to_string())
        })?;

        let result = GatewayReply::classify(status, &body)
            .and_then(|reply| reply.into_result(merchant_order_id));

        if let Err(e) = &result {
            tracing::warn!(operation, status, kind = e.kind(), error = %e, "Paymob call failed");
        }

        result
    }
}

#[async_trait]
impl PaymentGateway for PaymobClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authentication, GatewayError> {
        let auth: Authentication = self
            .post(
                "authenticate",
                "/api/auth/tokens",
                None,
                &AuthBody::from(credentials),
                None,
            )
            .await?;

        tracing::debug!(merchant_id = %auth.profile.id, "Authenticated with Paymob");
        Ok(auth)
    }

    async fn create_order(
        &self,
        token: &GatewayToken,
        request: CreateOrderRequest,
    ) -> Result<RemoteOrder, GatewayError> {
        let order: RemoteOrder = self
            .post(
                "create_order",
                "/api/ecommerce/orders",
                Some(token),
                &OrderBody::from(&request),
                Some(&request.merchant_order_id),
            )
            .await?;

        tracing::info!(
            remote_order_id = %order.id,
            merchant_order_id = %request.merchant_order_id,
            amount_cents = request.amount_cents,
            "Registered Paymob order"
        );
        Ok(order)
    }

    async fn request_payment_key(
        &self,
        token: &GatewayToken,
        request: PaymentKeyRequest,
    ) -> Result<PaymentKeyToken, GatewayError> {
        let reply: PaymentKeyReply = self
            .post(
                "request_payment_key",
                "/api/acceptance/payment_keys",
                Some(token),
                &PaymentKeyBody::from(&request),
                None,
            )
            .await?;

        tracing::debug!(remote_order_id = %request.order_id, "Issued payment key");
        Ok(reply.token)
    }

    async fn submit_payment(&self, request: CardPaymentRequest) -> Result<Transaction, GatewayError> {
        let transaction: Transaction = self
            .post(
                "submit_payment",
                "/api/acceptance/payments/pay",
                None,
                &PayBody::from(&request),
                None,
            )
            .await?;

        tracing::info!(
            remote_order_id = %request.order_id,
            transaction_id = %transaction.id,
            card = request.card.last_four(),
            outcome = transaction.outcome().as_str(),
            "Card payment submitted"
        );
        Ok(transaction)
    }

    async fn capture(
        &self,
        token: &GatewayToken,
        transaction_id: TransactionId,
        amount_cents: u64,
    ) -> Result<Transaction, GatewayError> {
        let body = CaptureBody {
            transaction_id,
            amount_cents,
        };

        let transaction: Transaction = self
            .post("capture", "/api/acceptance/capture", Some(token), &body, None)
            .await?;

        tracing::info!(
            transaction_id = %transaction_id,
            amount_cents,
            success = transaction.success,
            "Transaction capture requested"
        );
        Ok(transaction)
    }

    async fn list_orders(
        &self,
        token: &GatewayToken,
        page: u32,
    ) -> Result<Page<RemoteOrder>, GatewayError> {
        self.get("list_orders", "/api/ecommerce/orders", token, Some(page))
            .await
    }

    async fn get_order(
        &self,
        token: &GatewayToken,
        order_id: RemoteOrderId,
    ) -> Result<RemoteOrder, GatewayError> {
        let path = format!("/api/ecommerce/orders/{}", order_id);
        self.get("get_order", &path, token, None).await
    }

    async fn list_transactions(
        &self,
        token: &GatewayToken,
        page: u32,
    ) -> Result<Page<Transaction>, GatewayError> {
        self.get(
            "list_transactions",
            "/api/acceptance/transactions",
            token,
            Some(page),
        )
        .await
    }

    async fn get_transaction(
        &self,
        token: &GatewayToken,
        transaction_id: TransactionId,
    ) -> Result<Transaction, GatewayError> {
        let path = format!("/api/acceptance/transactions/{}", transaction_id);
        self.get("get_transaction", &path, token, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_production_host() {
        let config = PaymobClientConfig::new();
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = PaymobClientConfig::new().with_base_url("http://localhost:8080/");
        assert_eq!(config.api_base_url(), "http://localhost:8080");
    }

    #[test]
    fn url_joins_base_and_path() {
        let client =
            PaymobClient::new(PaymobClientConfig::new().with_base_url("http://stub")).unwrap();
        assert_eq!(client.url("/api/auth/tokens"), "http://stub/api/auth/tokens");
    }

    #[test]
    fn client_is_usable_as_port() {
        let client = PaymobClient::new(PaymobClientConfig::new()).unwrap();
        let _gateway: &dyn PaymentGateway = &client;
    }
}
