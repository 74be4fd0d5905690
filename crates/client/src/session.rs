//! Client-held credentials.
//!
//! A [`Session`] is built from the bearer token returned by `POST /sessions`.
//! Its payload is decoded without verifying the signature; only the server
//! can do that. The decoded expiry lets callers drop stale sessions before
//! making a request that is bound to fail.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ClientError, Result};

#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: Option<String>,
    exp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user_id: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(ClientError::MalformedToken(
                    "expected three dot-separated segments".to_string(),
                ))
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ClientError::MalformedToken(e.to_string()))?;
        let claims: TokenClaims = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::MalformedToken(e.to_string()))?;

        Ok(Self {
            user_id: claims.sub,
            expires_at: claims
                .exp
                .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
            token,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// A token without an expiry is treated as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the session if it can still be used.
    pub fn ensure_valid(&self) -> Result<&Self> {
        if self.is_expired() {
            return Err(ClientError::SessionExpired);
        }
        Ok(self)
    }
}

#[cfg(test)]
pub(crate) fn token_with_payload(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn decodes_subject_and_expiry() {
        let token = token_with_payload(&json!({"sub": "user-1", "iat": 1_700_000_000, "exp": 1_700_001_800}));

        let session = Session::from_token(token.clone()).unwrap();

        assert_eq!(session.token(), token);
        assert_eq!(session.user_id(), Some("user-1"));
        let expires_at = session.expires_at().unwrap();
        assert_eq!(expires_at.timestamp(), 1_700_001_800);
        assert!(!session.is_expired_at(expires_at - Duration::seconds(1)));
        assert!(session.is_expired_at(expires_at));
    }

    #[test]
    fn missing_expiry_counts_as_expired() {
        let session = Session::from_token(token_with_payload(&json!({"sub": "user-1"}))).unwrap();
        assert!(session.is_expired());
        assert!(matches!(
            session.ensure_valid(),
            Err(ClientError::SessionExpired)
        ));
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.!!!.c", "a.bm90LWpzb24.c"] {
            assert!(
                matches!(Session::from_token(token), Err(ClientError::MalformedToken(_))),
                "{token}"
            );
        }
    }
}
