//! Types and helpers shared by the outbound order gateway and the inbound notification receiver.
//!
//! The one invariant binding both halves of the protocol lives in [`signing`]: a payload signed by the gateway with a
//! merchant's auth token must verify at a receiver holding the same token.

pub mod headers;
pub mod helpers;
pub mod signing;

mod order_id;
mod secret;

pub use order_id::OrderId;
pub use secret::Secret;
pub use signing::{calculate_hmac, verify_hmac};
