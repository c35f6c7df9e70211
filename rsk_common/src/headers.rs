//! Header names and fixed header values used on every signed call.

/// Carries the hex-encoded HMAC-SHA256 of the request body.
pub const HMAC_HEADER: &str = "X-Riskified-Hmac-Sha256";
/// Identifies the merchant's shop.
pub const SHOP_DOMAIN_HEADER: &str = "X-Riskified-Shop-Domain";
/// Present (with the value `true`) only when an order should be analysed right away.
pub const SUBMIT_HEADER: &str = "X-Riskified-Submit-Now";
pub const SUBMIT_HEADER_VALUE: &str = "true";

pub const ACCEPT_ENCODING_VALUE: &str = "gzip,deflate,sdch";
pub const ACCEPT_VALUE: &str = "*/*";
pub const JSON_CONTENT_TYPE: &str = "application/json";
