use rsk_common::OrderId;
use thiserror::Error;

/// Everything a gateway operation can fail with.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Could not initialize gateway: {0}")]
    Initialization(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// A missing or malformed order field. Local to the caller and never caused by the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Order {order_id} is invalid. {message}")]
pub struct ValidationError {
    pub order_id: OrderId,
    pub message: String,
}

impl ValidationError {
    pub fn new<S: Into<String>>(order_id: &OrderId, message: S) -> Self {
        Self { order_id: order_id.clone(), message: message.into() }
    }
}

/// The exchange with the remote service failed, or produced a response that cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
    #[error("Could not serialize request body: {0}")]
    Serialization(String),
    #[error("Network error while contacting the server: {0}")]
    Network(String),
    #[error("The request timed out: {0}")]
    Timeout(String),
    #[error("Server responded with error {status}. {message}")]
    Status { status: u16, message: String },
    #[error("Empty response from server")]
    EmptyResponse,
    #[error("Could not deserialize server response: {0}")]
    Json(String),
    #[error("The server rejected the request: {0}")]
    Rejected(String),
    #[error("Unexpected status '{0}' in server response")]
    UnexpectedStatus(String),
    #[error("Server response did not contain an order id")]
    MissingOrderId,
}

impl From<reqwest::Error> for TransactionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_decode() {
            Self::Json(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
