//! Password and PIN hashing utility
//!
//! Thin wrapper around Argon2id used by the account lifecycle and ledger
//! components. The one piece of logic that matters here is the filler
//! hash: when no account exists for an identifier, verification still
//! runs against a fixed, never-matching hash so a request for an unknown
//! identifier costs the same as one for a real account. That keeps timing
//! from leaking which identifiers are registered.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::types::BankError;

/// Fixed, well-formed Argon2id hash that no secret verifies against
///
/// Used as the comparison target whenever the looked-up account does not
/// exist, so the verification work is always performed.
pub const FILLER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hash a password or PIN with Argon2id and a fresh random salt
pub fn hash_secret(secret: &str) -> Result<String, BankError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| BankError::Hashing {
            message: e.to_string(),
        })?;

    Ok(hash.to_string())
}

/// Verify a secret against a stored hash
///
/// An unparseable stored hash counts as a mismatch rather than an error;
/// the caller cannot do anything more useful with a corrupt hash than
/// reject the attempt.
pub fn secret_matches(secret: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

/// Verify a secret against an account's hash, or the filler hash when the
/// account is absent
///
/// The comparison ALWAYS runs. Returns true only when a real hash was
/// present and matched.
pub fn matches_or_filler(secret: &str, stored_hash: Option<&str>) -> bool {
    let matched = secret_matches(secret, stored_hash.unwrap_or(FILLER_HASH));
    matched && stored_hash.is_some()
}
