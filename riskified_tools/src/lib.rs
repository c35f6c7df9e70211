//! Client side of the Riskified integration.
//!
//! [`OrdersGateway`] validates order events, signs them with the merchant's auth token and posts them to the
//! configured Riskified environment. Historical orders are imported in bounded batches through
//! [`OrdersGateway::send_historical_orders`], and [`WebhookRegistrar`] tells Riskified where to send decision
//! notifications.

pub mod config;
pub mod data_objects;
pub mod orders;
pub mod transport;

mod client;
mod error;
mod gateway;
mod historical;
mod registration;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use client::RiskifiedClient;
pub use config::{Environment, GatewayConfig};
pub use error::{GatewayError, TransactionError, ValidationError};
pub use gateway::{interpret_result, OrderReceipt, Operation, OrdersGateway};
pub use historical::{FailedOrders, HistoricalReport, HISTORICAL_BATCH_SIZE};
pub use registration::WebhookRegistrar;
