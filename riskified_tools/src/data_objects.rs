use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::orders::Order;

//----------------------------------------   Request bodies   ----------------------------------------------------------
/// `{"order": {...}}`, the body of every single-order request.
#[derive(Debug, Serialize)]
pub struct OrderWrapper<'a, O: Serialize> {
    pub order: &'a O,
}

/// `{"orders": [...]}`, the body of a historical batch.
#[derive(Debug, Serialize)]
pub struct OrdersWrapper<'a> {
    pub orders: &'a [Order],
}

#[derive(Debug, Serialize)]
pub struct WebhookWrapper<'a> {
    pub notification_webhook: NotificationWebhook<'a>,
}

#[derive(Debug, Serialize)]
pub struct NotificationWebhook<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    pub shop_domain: &'a str,
    pub auth_token: &'a str,
}

//----------------------------------------   TransactionResult   -------------------------------------------------------
/// The status literals Riskified uses to acknowledge a single-order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Created,
    Updated,
    Submitted,
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "submitted" => Ok(Self::Submitted),
            other => Err(other.to_string()),
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Updated => f.write_str("updated"),
            Self::Submitted => f.write_str("submitted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessfulResult {
    #[serde(default)]
    pub id: Option<i64>,
    /// Kept as the raw literal so that unknown statuses can be reported rather than failing the decode.
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedResult {
    pub message: String,
}

/// The outcome of a single-order exchange. Exactly one arm is present on the wire; anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTransactionResult")]
pub enum TransactionResult {
    Success(SuccessfulResult),
    Failure(FailedResult),
}

impl TransactionResult {
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Deserialize)]
struct RawTransactionResult {
    order: Option<SuccessfulResult>,
    error: Option<FailedResult>,
}

impl TryFrom<RawTransactionResult> for TransactionResult {
    type Error = String;

    fn try_from(raw: RawTransactionResult) -> Result<Self, Self::Error> {
        match (raw.order, raw.error) {
            (Some(order), None) => Ok(Self::Success(order)),
            (None, Some(error)) => Ok(Self::Failure(error)),
            (Some(_), Some(_)) => Err("response contains both an order and an error".to_string()),
            (None, None) => Err("response contains neither an order nor an error".to_string()),
        }
    }
}

//----------------------------------------   HistoricalBatchResult   ---------------------------------------------------
/// Riskified's answer to one historical batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBatchResult")]
pub enum HistoricalBatchResult {
    Accepted(Vec<Value>),
    Rejected(FailedResult),
}

#[derive(Deserialize)]
struct RawBatchResult {
    orders: Option<Vec<Value>>,
    error: Option<FailedResult>,
}

impl TryFrom<RawBatchResult> for HistoricalBatchResult {
    type Error = String;

    fn try_from(raw: RawBatchResult) -> Result<Self, Self::Error> {
        match (raw.orders, raw.error) {
            (Some(orders), None) => Ok(Self::Accepted(orders)),
            (None, Some(error)) => Ok(Self::Rejected(error)),
            (Some(_), Some(_)) => Err("response contains both orders and an error".to_string()),
            (None, None) => Err("response contains neither orders nor an error".to_string()),
        }
    }
}

//----------------------------------------   RegistrationResult   ------------------------------------------------------
/// The outcome of a webhook registration or unregistration call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRegistrationResult")]
pub enum RegistrationResult {
    Success { message: String },
    Failure { message: String },
}

impl RegistrationResult {
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Failure { message } => message,
        }
    }
}

#[derive(Deserialize)]
struct RawRegistrationResult {
    registration_result: Option<FailedResult>,
    error: Option<FailedResult>,
}

impl TryFrom<RawRegistrationResult> for RegistrationResult {
    type Error = String;

    fn try_from(raw: RawRegistrationResult) -> Result<Self, Self::Error> {
        match (raw.registration_result, raw.error) {
            (Some(ok), None) => Ok(Self::Success { message: ok.message }),
            (None, Some(err)) => Ok(Self::Failure { message: err.message }),
            (Some(_), Some(_)) => Err("response contains both a registration result and an error".to_string()),
            (None, None) => Err("response contains neither a registration result nor an error".to_string()),
        }
    }
}
