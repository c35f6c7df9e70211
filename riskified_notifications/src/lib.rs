//! # Riskified notification receiver
//! Riskified reports its decisions on submitted orders asynchronously, by POSTing a signed notification to a webhook
//! registered by the merchant. This crate hosts that webhook. It is responsible for:
//! Listening on the configured path for incoming notifications.
//! Rejecting any request whose `X-Riskified-Hmac-Sha256` signature does not match the merchant auth token.
//! Parsing the notification and handing it to the caller's [`NotificationHandler`].
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Lifecycle
//! [`NotificationServer::start`] runs until [`NotificationServer::stop`] is called from another task or thread.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod notification;
pub mod routes;
pub mod server;

pub use config::ReceiverConfig;
pub use errors::{NotificationError, ServerError};
pub use notification::{Notification, NotificationDispatcher, NotificationHandler, NotificationStatus};
pub use server::NotificationServer;
