use chrono::{DateTime, Utc};
use rsk_common::OrderId;
use serde::{Deserialize, Serialize};

use super::{validators::FieldValidator, RiskOrder, ValidationMode};
use crate::ValidationError;

/// One or more partial refunds against an existing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPartialRefund {
    pub id: OrderId,
    pub partial_refunds: Vec<PartialRefundDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialRefundDetails {
    pub refund_id: String,
    pub refunded_at: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
    pub reason: String,
}

impl OrderPartialRefund {
    pub fn new<I: Into<OrderId>>(id: I, partial_refunds: Vec<PartialRefundDetails>) -> Self {
        Self { id: id.into(), partial_refunds }
    }
}

impl RiskOrder for OrderPartialRefund {
    fn order_id(&self) -> &OrderId {
        &self.id
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationError> {
        let v = FieldValidator::new(&self.id, mode);
        v.order_id()?;
        if self.partial_refunds.is_empty() {
            return Err(v.fail("At least one partial refund is required"));
        }
        for refund in &self.partial_refunds {
            v.non_blank(&refund.refund_id, "Refund id")?;
            v.positive(refund.amount, "Refund amount")?;
            v.currency(&Some(refund.currency.clone()), "Refund currency")?;
            v.non_blank(&refund.reason, "Refund reason")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;

    fn details(amount: f64) -> PartialRefundDetails {
        PartialRefundDetails {
            refund_id: "r-1".into(),
            refunded_at: Utc::now(),
            amount,
            currency: "EUR".into(),
            reason: "Damaged item".into(),
        }
    }

    #[test]
    fn refunds_must_be_positive_and_present() {
        assert!(OrderPartialRefund::new("9", vec![details(12.5)]).validate(ValidationMode::Strict).is_ok());
        assert!(OrderPartialRefund::new("9", vec![details(0.0)]).validate(ValidationMode::Strict).is_err());
        let err = OrderPartialRefund::new("9", vec![]).validate(ValidationMode::Weak).unwrap_err();
        assert_eq!(err.order_id, OrderId::from("9"));
    }

    #[test]
    fn serializes_refund_list() {
        let json = serde_json::to_value(OrderPartialRefund::new("9", vec![details(3.0)])).unwrap();
        assert_eq!(json["id"], "9");
        assert_eq!(json["partial_refunds"][0]["amount"], 3.0);
        assert_eq!(json["partial_refunds"][0]["currency"], "EUR");
    }
}
