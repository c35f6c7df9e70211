//! HMAC-SHA256 message authentication.
//!
//! Both the gateway (when sending) and the notification receiver (when accepting a callback) use these functions with
//! the merchant's auth token as the key and the raw JSON body as the message. The signature travels hex encoded in the
//! [`HMAC_HEADER`](crate::headers::HMAC_HEADER) header.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Calculates the lowercase hex HMAC-SHA256 of `payload` keyed with `secret`.
pub fn calculate_hmac(secret: &str, payload: &[u8]) -> String {
    hex::encode(mac_for(secret, payload).finalize().into_bytes())
}

/// Checks `signature` (hex, any case) against the HMAC of `payload`. The comparison is constant-time.
pub fn verify_hmac(secret: &str, payload: &[u8], signature: &str) -> bool {
    match hex::decode(signature.trim()) {
        Ok(expected) => mac_for(secret, payload).verify_slice(&expected).is_ok(),
        Err(_) => false,
    }
}

fn mac_for(secret: &str, payload: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length, so this cannot fail
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC keys can be of any size"),
    };
    mac.update(payload);
    mac
}

#[cfg(test)]
mod test {
    use super::*;

    const PAYLOAD: &[u8] = br#"{"order":{"id":"1001","email":"alice@example.com","total_price":120.5}}"#;

    #[test]
    fn known_vector() {
        // RFC 4231, test case 2
        let sig = calculate_hmac("Jefe", b"what do ya want for nothing?");
        assert_eq!(sig, "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }

    #[test]
    fn signatures_are_deterministic() {
        let a = calculate_hmac("merchant-token", PAYLOAD);
        let b = calculate_hmac("merchant-token", PAYLOAD);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn round_trip_verifies() {
        let sig = calculate_hmac("merchant-token", PAYLOAD);
        assert!(verify_hmac("merchant-token", PAYLOAD, &sig));
        assert!(verify_hmac("merchant-token", PAYLOAD, &sig.to_uppercase()));
    }

    #[test]
    fn every_single_byte_mutation_fails() {
        let sig = calculate_hmac("merchant-token", PAYLOAD);
        for i in 0..PAYLOAD.len() {
            let mut tampered = PAYLOAD.to_vec();
            tampered[i] ^= 0x01;
            assert!(!verify_hmac("merchant-token", &tampered, &sig), "mutation at byte {i} went unnoticed");
        }
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = calculate_hmac("merchant-token", PAYLOAD);
        assert!(!verify_hmac("merchant-token2", PAYLOAD, &sig));
        assert!(!verify_hmac("", PAYLOAD, &sig));
    }

    #[test]
    fn garbage_signatures_fail() {
        assert!(!verify_hmac("merchant-token", PAYLOAD, ""));
        assert!(!verify_hmac("merchant-token", PAYLOAD, "not hex at all"));
        assert!(!verify_hmac("merchant-token", PAYLOAD, "abcd"));
    }
}
