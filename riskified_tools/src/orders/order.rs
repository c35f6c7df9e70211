use chrono::{DateTime, Utc};
use rsk_common::OrderId;
use serde::{Deserialize, Serialize};

use super::{validators::FieldValidator, RiskOrder, ValidationMode};
use crate::ValidationError;

/// A full order, used for create, update, submit and historical import.
///
/// Most fields are optional at the type level so that partial historical records can be represented. Which of them
/// must actually be present is decided by [`ValidationMode`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub shipping_lines: Vec<ShippingLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discount_codes: Vec<DiscountCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_discounts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// One of "customer", "fraud", "inventory" or "other".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// The final status of a historical order, e.g. "paid", "cancelled" or "chargeback".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_status: Option<String>,
}

impl Order {
    pub fn new<I: Into<OrderId>>(id: I) -> Self {
        Self { id: id.into(), ..Default::default() }
    }
}

impl RiskOrder for Order {
    fn order_id(&self) -> &OrderId {
        &self.id
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationError> {
        let v = FieldValidator::new(&self.id, mode);
        v.order_id()?;
        v.email(&self.email, "Email")?;
        if let Some(customer) = v.required(&self.customer, "Customer")? {
            customer.validate(&v)?;
        }
        if let Some(address) = v.required(&self.billing_address, "Billing Address")? {
            address.validate(&v, "Billing Address")?;
        }
        if let Some(address) = v.required(&self.shipping_address, "Shipping Address")? {
            address.validate(&v, "Shipping Address")?;
        }
        if let Some(payment) = v.required(&self.payment_details, "Payment Details")? {
            payment.validate(&v)?;
        }
        v.not_empty(&self.line_items, "Line Items")?;
        for item in &self.line_items {
            item.validate(&v)?;
        }
        for line in &self.shipping_lines {
            v.non_blank(&line.title, "Shipping Line title")?;
            v.non_negative(&Some(line.price), "Shipping Line price")?;
        }
        for discount in &self.discount_codes {
            v.non_blank(&discount.code, "Discount Code")?;
            v.non_negative(&Some(discount.amount), "Discount Code amount")?;
        }
        v.valued_string(&self.gateway, "Gateway")?;
        v.ip(&self.browser_ip, "Browser IP")?;
        v.currency(&self.currency, "Currency")?;
        v.non_negative(&self.total_price, "Total Price")?;
        if self.total_discounts.is_some() {
            v.non_negative(&self.total_discounts, "Total Discounts")?;
        }
        if self.total_price_usd.is_some() {
            v.non_negative(&self.total_price_usd, "Total Price USD")?;
        }
        v.required(&self.created_at, "Created At")?;
        v.required(&self.updated_at, "Updated At")?;
        if let (Some(created), Some(updated)) = (self.created_at, self.updated_at) {
            if updated < created {
                return Err(v.fail("Updated At must not be earlier than Created At"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    fn validate(&self, v: &FieldValidator<'_>) -> Result<(), ValidationError> {
        v.non_blank(&self.first_name, "Customer first name")?;
        v.non_blank(&self.last_name, "Customer last name")?;
        if self.email.is_some() {
            v.email(&self.email, "Customer email")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    pub country: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Address {
    fn validate(&self, v: &FieldValidator<'_>, field: &str) -> Result<(), ValidationError> {
        v.non_blank(&self.first_name, &format!("{field} first name"))?;
        v.non_blank(&self.last_name, &format!("{field} last name"))?;
        v.non_blank(&self.address1, &format!("{field} address1"))?;
        v.non_blank(&self.city, &format!("{field} city"))?;
        v.non_blank(&self.country, &format!("{field} country"))?;
        let code = self.country_code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(v.fail(format!("{field} country code must be two letters, not '{}'", self.country_code)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub credit_card_bin: String,
    pub credit_card_company: String,
    /// The masked card number, e.g. "XXXX-XXXX-XXXX-4242".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avs_result_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv_result_code: Option<String>,
}

impl PaymentDetails {
    fn validate(&self, v: &FieldValidator<'_>) -> Result<(), ValidationError> {
        v.non_blank(&self.credit_card_company, "Credit card company")?;
        let bin = self.credit_card_bin.trim();
        if bin.len() != 6 || !bin.chars().all(|c| c.is_ascii_digit()) {
            return Err(v.fail(format!("Credit card BIN must be six digits, not '{}'", self.credit_card_bin)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl LineItem {
    fn validate(&self, v: &FieldValidator<'_>) -> Result<(), ValidationError> {
        v.non_blank(&self.title, "Line Item title")?;
        v.non_negative(&Some(self.price), "Line Item price")?;
        if self.quantity == 0 {
            return Err(v.fail(format!("Line Item '{}' has a quantity of zero", self.title)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingLine {
    pub title: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: String,
    pub amount: f64,
}

#[cfg(test)]
pub(crate) mod test {
    use chrono::{TimeZone, Utc};

    use super::*;

    /// An order that passes strict validation.
    pub fn complete_order(id: &str) -> Order {
        let address = Address {
            first_name: "Alice".into(),
            last_name: "Adams".into(),
            address1: "1 Main St".into(),
            city: "Springfield".into(),
            country: "United States".into(),
            country_code: "US".into(),
            zip: Some("12345".into()),
            ..Default::default()
        };
        Order {
            id: OrderId::from(id),
            email: Some("alice@example.com".into()),
            customer: Some(Customer {
                id: Some("c-1".into()),
                email: Some("alice@example.com".into()),
                first_name: "Alice".into(),
                last_name: "Adams".into(),
                ..Default::default()
            }),
            billing_address: Some(address.clone()),
            shipping_address: Some(address),
            payment_details: Some(PaymentDetails {
                credit_card_bin: "424242".into(),
                credit_card_company: "Visa".into(),
                credit_card_number: Some("XXXX-XXXX-XXXX-4242".into()),
                ..Default::default()
            }),
            line_items: vec![LineItem { title: "Teapot".into(), price: 45.0, quantity: 2, ..Default::default() }],
            shipping_lines: vec![ShippingLine { title: "Ground".into(), price: 5.0, code: None }],
            gateway: Some("stripe".into()),
            browser_ip: Some("203.0.113.7".into()),
            currency: Some("USD".into()),
            total_price: Some(95.0),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 5, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn complete_order_passes_strict_validation() {
        assert!(complete_order("1001").validate(ValidationMode::Strict).is_ok());
    }

    #[test]
    fn sparse_historical_order_passes_weak_only() {
        let order = Order { financial_status: Some("paid".into()), ..Order::new("legacy-1") };
        assert!(order.validate(ValidationMode::Weak).is_ok());
        let err = order.validate(ValidationMode::Strict).unwrap_err();
        assert_eq!(err.order_id, OrderId::from("legacy-1"));
        assert_eq!(err.message, "Email is required");
    }

    #[test]
    fn malformed_fields_fail_even_in_weak_mode() {
        let order = Order { browser_ip: Some("localhost".into()), ..Order::new("legacy-2") };
        let err = order.validate(ValidationMode::Weak).unwrap_err();
        assert!(err.message.contains("Browser IP"), "{}", err.message);
    }

    #[test]
    fn strict_validation_catches_nested_problems() {
        let mut order = complete_order("1002");
        order.line_items[0].quantity = 0;
        assert!(order.validate(ValidationMode::Strict).is_err());

        let mut order = complete_order("1003");
        order.line_items.clear();
        let err = order.validate(ValidationMode::Strict).unwrap_err();
        assert_eq!(err.message, "Line Items must contain at least one entry");

        let mut order = complete_order("1004");
        order.updated_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert!(order.validate(ValidationMode::Strict).is_err());

        let mut order = complete_order("1005");
        if let Some(p) = order.payment_details.as_mut() {
            p.credit_card_bin = "42".into();
        }
        assert!(order.validate(ValidationMode::Strict).is_err());
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let json = serde_json::to_value(Order::new(77i64)).unwrap();
        assert_eq!(json, serde_json::json!({"id": "77", "line_items": [], "shipping_lines": []}));
    }
}
