use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use rsk_common::OrderId;

use super::ValidationMode;
use crate::ValidationError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

/// Field checks for a single order, bound to that order's id so that failures carry it.
pub(crate) struct FieldValidator<'a> {
    order_id: &'a OrderId,
    mode: ValidationMode,
}

impl<'a> FieldValidator<'a> {
    pub fn new(order_id: &'a OrderId, mode: ValidationMode) -> Self {
        Self { order_id, mode }
    }

    pub fn fail<S: Into<String>>(&self, message: S) -> ValidationError {
        ValidationError::new(self.order_id, message)
    }

    pub fn order_id(&self) -> Result<(), ValidationError> {
        if self.order_id.is_blank() {
            return Err(self.fail("Order id must not be blank"));
        }
        Ok(())
    }

    /// Unwraps an optional field. A missing field is an error in strict mode and `Ok(None)` in weak mode.
    pub fn required<'v, T>(&self, value: &'v Option<T>, field: &str) -> Result<Option<&'v T>, ValidationError> {
        match value {
            Some(v) => Ok(Some(v)),
            None if self.mode.is_weak() => Ok(None),
            None => Err(self.fail(format!("{field} is required"))),
        }
    }

    pub fn non_blank(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(self.fail(format!("{field} must not be blank")));
        }
        Ok(())
    }

    pub fn valued_string(&self, value: &Option<String>, field: &str) -> Result<(), ValidationError> {
        match self.required(value, field)? {
            Some(s) => self.non_blank(s, field),
            None => Ok(()),
        }
    }

    pub fn email(&self, value: &Option<String>, field: &str) -> Result<(), ValidationError> {
        match self.required(value, field)? {
            Some(email) if !EMAIL_RE.is_match(email.trim()) => {
                Err(self.fail(format!("{field} is not a valid email address: '{email}'")))
            },
            _ => Ok(()),
        }
    }

    pub fn ip(&self, value: &Option<String>, field: &str) -> Result<(), ValidationError> {
        match self.required(value, field)? {
            Some(ip) if ip.trim().parse::<IpAddr>().is_err() => {
                Err(self.fail(format!("{field} is not a valid IP address: '{ip}'")))
            },
            _ => Ok(()),
        }
    }

    pub fn currency(&self, value: &Option<String>, field: &str) -> Result<(), ValidationError> {
        match self.required(value, field)? {
            Some(code) if !CURRENCY_RE.is_match(code) => {
                Err(self.fail(format!("{field} must be a three letter ISO 4217 code, not '{code}'")))
            },
            _ => Ok(()),
        }
    }

    pub fn non_negative(&self, value: &Option<f64>, field: &str) -> Result<(), ValidationError> {
        match self.required(value, field)? {
            Some(v) if !v.is_finite() || *v < 0.0 => Err(self.fail(format!("{field} must be zero or positive"))),
            _ => Ok(()),
        }
    }

    pub fn positive(&self, value: f64, field: &str) -> Result<(), ValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(self.fail(format!("{field} must be positive")));
        }
        Ok(())
    }

    pub fn not_empty<T>(&self, items: &[T], field: &str) -> Result<(), ValidationError> {
        if items.is_empty() && !self.mode.is_weak() {
            return Err(self.fail(format!("{field} must contain at least one entry")));
        }
        Ok(())
    }
}
