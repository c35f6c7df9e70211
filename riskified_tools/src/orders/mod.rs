//! The order objects that can be sent to Riskified, and the rules they must satisfy before they leave the building.

mod cancellation;
mod order;
mod refund;
mod validators;

use std::{fmt::Display, str::FromStr};

pub use cancellation::OrderCancellation;
pub use order::{Address, Customer, DiscountCode, LineItem, Order, PaymentDetails, ShippingLine};
pub use refund::{OrderPartialRefund, PartialRefundDetails};
use rsk_common::OrderId;
use serde::Serialize;

use crate::ValidationError;

/// Which rule set a validation call applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every field that is mandatory for a live order must be present and well-formed.
    #[default]
    Strict,
    /// Only the order id is mandatory. Fields that are present must still be well-formed.
    Weak,
}

impl ValidationMode {
    pub fn is_weak(&self) -> bool {
        matches!(self, Self::Weak)
    }
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "weak" => Ok(Self::Weak),
            other => Err(format!("'{other}' is not a validation mode. Use 'strict' or 'weak'")),
        }
    }
}

impl Display for ValidationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Weak => f.write_str("weak"),
        }
    }
}

/// An order event that can be validated and serialized onto the wire.
pub trait RiskOrder: Serialize {
    fn order_id(&self) -> &OrderId;

    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationError>;
}
