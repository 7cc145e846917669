//! Unverified JWT claim decoding.
//!
//! The token is opaque to the client. Its payload is decoded only to show the
//! email and role; the signature is never checked and `exp` is never enforced.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims the backend puts in its access tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rol: Option<String>,
    /// Expiry as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT.
    ///
    /// Returns `None` for anything that is not a three-part token with a
    /// base64url JSON payload.
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        let mut parts = token.split('.');
        let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Expiry time, if the token has a valid `exp`.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn token(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_decode_claims() {
        let claims =
            TokenClaims::decode(&token(r#"{"email":"a@b.com","rol":"admin","exp":1700000000}"#))
                .unwrap();

        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.rol.as_deref(), Some("admin"));
        assert_eq!(
            claims.expires_at().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn test_decode_missing_claims() {
        let claims = TokenClaims::decode(&token(r#"{"sub":"1"}"#)).unwrap();
        assert_eq!(claims, TokenClaims::default());
        assert!(claims.expires_at().is_none());
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(TokenClaims::decode("t1").is_none());
        assert!(TokenClaims::decode("a.b").is_none());
        assert!(TokenClaims::decode("a.!!!.c").is_none());
        assert!(TokenClaims::decode(&token("not json")).is_none());
        assert!(TokenClaims::decode("a.b.c.d").is_none());
    }
}
