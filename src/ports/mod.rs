//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - The remote payment gateway API
//! - `OrderRepository` - Persistence of the shop's local orders
//! - `OrderStatusHandler` - Shop-specific follow-up for resolved payments

mod order_repository;
mod order_status_handler;
mod payment_gateway;

pub use order_repository::{OrderRepository, RepositoryError};
pub use order_status_handler::OrderStatusHandler;
pub use payment_gateway::{
    Authentication, CardPaymentRequest, CreateOrderRequest, Credentials, GatewayError,
    GatewayToken, MerchantProfile, Page, PaymentGateway, PaymentKeyRequest, PaymentKeyToken,
    RemoteOrder, SourceData, Transaction,
};
