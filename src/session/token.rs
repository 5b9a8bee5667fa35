//! Bearer token payload decoding and validity checks

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Claims the dashboard reads from the token payload
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Subject, the user id
    #[serde(default)]
    pub sub: String,

    /// Display name of the user
    #[serde(default)]
    pub username: String,

    /// Authorization role
    #[serde(default)]
    pub role: String,

    /// Expiry as unix seconds
    pub exp: i64,
}

/// Decode the payload segment of a three-part bearer token.
///
/// Returns `None` for anything that is not a three-part token whose
/// middle segment is base64url JSON carrying a numeric `exp`.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')).ok()?;
    serde_json::from_slice(&payload).ok()
}

/// Check whether a token is well-formed and unexpired.
///
/// Every failure path degrades to `false`; this never panics on
/// malformed input.
pub fn is_valid_token(token: &str) -> bool {
    match decode_claims(token) {
        Some(claims) => claims.exp > unix_now(),
        None => false,
    }
}

/// Current unix time in seconds
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs() as i64
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    format!("header.{}.signature", URL_SAFE_NO_PAD.encode(payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use serde_json::json;

    #[test]
    fn accepts_an_unexpired_token() {
        let token = encode_test_token(&json!({
            "sub": "u1",
            "username": "admin",
            "role": "Admin",
            "exp": unix_now() + 3600,
        }));

        assert!(is_valid_token(&token));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, "Admin");
    }

    #[test]
    fn rejects_an_expired_token() {
        let token = encode_test_token(&json!({ "exp": unix_now() - 1 }));
        assert!(!is_valid_token(&token));
    }

    #[test]
    fn rejects_a_token_expiring_right_now() {
        let token = encode_test_token(&json!({ "exp": unix_now() }));
        assert!(!is_valid_token(&token));
    }

    #[test]
    fn rejects_tokens_without_three_segments() {
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("justonechunk"));
        assert!(!is_valid_token("two.parts"));
        assert!(!is_valid_token("four.whole.parts.here"));
    }

    #[test]
    fn rejects_a_payload_that_is_not_base64() {
        assert!(!is_valid_token("header.!!!not-base64!!!.signature"));
    }

    #[test]
    fn rejects_a_payload_that_is_not_json() {
        let payload = URL_SAFE_NO_PAD.encode("plain text");
        assert!(!is_valid_token(&format!("header.{}.signature", payload)));
    }

    #[test]
    fn rejects_a_payload_without_exp() {
        let token = encode_test_token(&json!({ "sub": "u1" }));
        assert!(!is_valid_token(&token));
    }

    #[test]
    fn tolerates_padded_base64_payloads() {
        let payload = json!({ "exp": unix_now() + 60 }).to_string();
        let padded = base64::engine::general_purpose::URL_SAFE.encode(payload);
        assert!(is_valid_token(&format!("header.{}.signature", padded)));
    }

    #[test]
    fn missing_identity_claims_default_to_empty() {
        let token = encode_test_token(&json!({ "exp": unix_now() + 60 }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "");
        assert_eq!(claims.username, "");
        assert_eq!(claims.role, "");
    }
}
