use chrono::{DateTime, Utc};
use rsk_common::OrderId;
use serde::{Deserialize, Serialize};

use super::{validators::FieldValidator, RiskOrder, ValidationMode};
use crate::ValidationError;

/// Cancels an order that Riskified has already seen.
///
/// The timestamp and reason are mandatory regardless of the validation mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCancellation {
    pub id: OrderId,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
}

impl OrderCancellation {
    pub fn new<I: Into<OrderId>, S: Into<String>>(id: I, cancelled_at: DateTime<Utc>, reason: S) -> Self {
        Self { id: id.into(), cancelled_at: Some(cancelled_at), cancel_reason: Some(reason.into()) }
    }
}

impl RiskOrder for OrderCancellation {
    fn order_id(&self) -> &OrderId {
        &self.id
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationError> {
        let v = FieldValidator::new(&self.id, mode);
        v.order_id()?;
        if self.cancelled_at.is_none() {
            return Err(v.fail("Cancelled At is required"));
        }
        match &self.cancel_reason {
            Some(reason) => v.non_blank(reason, "Cancel Reason"),
            None => Err(v.fail("Cancel Reason is required")),
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;

    #[test]
    fn reason_and_timestamp_are_always_required() {
        let ok = OrderCancellation::new("55", Utc::now(), "customer");
        assert!(ok.validate(ValidationMode::Strict).is_ok());

        let no_reason = OrderCancellation { cancel_reason: None, ..ok.clone() };
        let err = no_reason.validate(ValidationMode::Weak).unwrap_err();
        assert_eq!(err.message, "Cancel Reason is required");

        let no_time = OrderCancellation { cancelled_at: None, ..ok.clone() };
        assert!(no_time.validate(ValidationMode::Weak).is_err());

        let blank_reason = OrderCancellation { cancel_reason: Some("  ".into()), ..ok };
        assert!(blank_reason.validate(ValidationMode::Strict).is_err());
    }
}
