//! Opaque signed session tokens
//!
//! Issued on successful login. A token is the hex encoding of a JSON
//! claims document plus an HMAC-SHA256 signature over those bytes:
//!
//! ```text
//! hex(claims_json) . hex(hmac_sha256(secret, claims_json))
//! ```
//!
//! The token is opaque to callers; only a holder of the signing secret
//! can mint or verify one. Claim validation (issued-at / expiry window)
//! is deterministic given `now`, so it is directly testable.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime
const DEFAULT_TTL_HOURS: i64 = 24;

/// Claims carried inside a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Authenticated identifier
    pub email: String,
    /// Account number of the authenticated account
    pub account_number: String,
    /// Issued-at timestamp
    pub issued_at: DateTime<Utc>,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
}

/// Token verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,
}

/// Issues and verifies session tokens with a process-wide secret
#[derive(Debug, Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer with the default token lifetime
    pub fn new(secret: &str) -> Self {
        TokenSigner {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }

    /// Create a signer with an explicit token lifetime
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        TokenSigner {
            secret: secret.as_bytes().to_vec(),
            ttl,
        }
    }

    /// Issue a token for an authenticated identity
    pub fn issue(&self, email: &str, account_number: &str) -> String {
        let issued_at = Utc::now();
        let claims = SessionClaims {
            email: email.to_string(),
            account_number: account_number.to_string(),
            issued_at,
            expires_at: issued_at + self.ttl,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &SessionClaims) -> String {
        // Serialization of a plain struct with string/timestamp fields
        // cannot fail; fall back to an empty document rather than panic.
        let payload = serde_json::to_vec(claims).unwrap_or_default();
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        format!("{}.{}", hex::encode(&payload), hex::encode(signature))
    }

    /// Verify a token's signature and validity window, returning its claims
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let (payload_hex, signature_hex) =
            token.split_once('.').ok_or(TokenError::Malformed)?;
        let payload = hex::decode(payload_hex).map_err(|_| TokenError::Malformed)?;
        let signature = hex::decode(signature_hex).map_err(|_| TokenError::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC accepts keys of any length");
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        validate_claims(&claims, Utc::now())?;
        Ok(claims)
    }
}

/// Deterministically validate a claims window against `now`
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if now < claims.issued_at {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue("alice@x.com", "391000000001");

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.account_number, "391000000001");
        assert!(claims.expires_at > claims.issued_at);
    }

    #[test]
    fn test_token_is_opaque() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue("alice@x.com", "391000000001");
        assert!(!token.contains("alice"));
        assert!(!token.contains("391000000001"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = TokenSigner::new("test-secret");
        let other = TokenSigner::new("other-secret");
        let token = signer.issue("alice@x.com", "391000000001");

        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.issue("alice@x.com", "391000000001");

        let mut tampered: String = token.clone();
        // Flip one hex digit of the payload half
        let first = if tampered.starts_with('0') { '1' } else { '0' };
        tampered.replace_range(0..1, &first.to_string());

        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let signer = TokenSigner::new("test-secret");
        assert_eq!(signer.verify("no-dot-here"), Err(TokenError::Malformed));
        assert_eq!(signer.verify("zz.zz"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = TokenSigner::with_ttl("test-secret", Duration::hours(1));
        let issued_at = Utc::now() - Duration::hours(3);
        let claims = SessionClaims {
            email: "alice@x.com".to_string(),
            account_number: "391000000001".to_string(),
            issued_at,
            expires_at: issued_at + Duration::hours(1),
        };

        assert_eq!(
            validate_claims(&claims, Utc::now()),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_future_token_rejected() {
        let issued_at = Utc::now() + Duration::hours(1);
        let claims = SessionClaims {
            email: "alice@x.com".to_string(),
            account_number: "391000000001".to_string(),
            issued_at,
            expires_at: issued_at + Duration::hours(1),
        };

        assert_eq!(
            validate_claims(&claims, Utc::now()),
            Err(TokenError::NotYetValid)
        );
    }
}
