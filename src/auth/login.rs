//! Login gate: throttle check, credential comparison, session issuance
//!
//! Ties the pieces of the authentication path together in a fixed order:
//! account lookup, lockout pre-flight, credential comparison (always
//! performed, against the filler hash when the account is absent), then
//! either session issuance or failure accounting.
//!
//! Every outcome is a value of [`LoginOutcome`]; this path never returns
//! an error, and a missing identifier is indistinguishable from a wrong
//! password from the caller's point of view.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::auth::password;
use crate::auth::session::TokenSigner;
use crate::auth::throttle::{LoginThrottle, ThrottleStatus};
use crate::store::AccountStore;

/// Identity descriptor returned on a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub email: String,
    pub username: String,
    pub account_number: String,
    /// Opaque signed session token
    pub token: String,
}

/// Every possible result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; the throttle record was cleared
    Authenticated(AuthenticatedSession),

    /// Wrong credential or unknown identifier
    NoMatch {
        /// Failure count after this attempt. Reaching the configured
        /// limit means this attempt crossed the threshold; the next one
        /// will be rejected outright.
        attempts: u32,
    },

    /// Identifier is locked; no credential comparison was performed
    LockedOut {
        attempts: u32,
        minutes_remaining: u64,
    },
}

/// Authentication service guarding logins with the attempt throttle
pub struct LoginService {
    accounts: Arc<dyn AccountStore>,
    throttle: LoginThrottle,
    signer: TokenSigner,
}

impl LoginService {
    pub fn new(accounts: Arc<dyn AccountStore>, throttle: LoginThrottle, signer: TokenSigner) -> Self {
        LoginService {
            accounts,
            throttle,
            signer,
        }
    }

    /// Check an email/password pair
    ///
    /// Lockout is evaluated first, from the state left by previous
    /// attempts; a locked identifier is rejected without comparing
    /// credentials, even if the password is now correct. Otherwise the
    /// Argon2 comparison always runs, against the stored hash or the
    /// filler hash when no account exists for the email.
    pub fn check_login(&self, email: &str, password_attempt: &str) -> LoginOutcome {
        let account = self.accounts.find_by_email(email);

        if let ThrottleStatus::Locked {
            attempts,
            minutes_remaining,
        } = self.throttle.preflight(email)
        {
            warn!(email, attempts, minutes_remaining, "login rejected: locked out");
            return LoginOutcome::LockedOut {
                attempts,
                minutes_remaining,
            };
        }

        let matched = password::matches_or_filler(
            password_attempt,
            account.as_ref().map(|a| a.password_hash.as_str()),
        );

        match account {
            Some(account) if matched => {
                self.throttle.clear(email);
                debug!(email, username = %account.username, "login succeeded");
                LoginOutcome::Authenticated(AuthenticatedSession {
                    token: self.signer.issue(&account.email, &account.account_number),
                    email: account.email,
                    username: account.username,
                    account_number: account.account_number,
                })
            }
            _ => {
                let attempts = self.throttle.record_failure(email);
                if attempts >= self.throttle.max_attempts() {
                    warn!(email, attempts, "login failed: attempt limit reached");
                } else {
                    debug!(email, attempts, "login failed");
                }
                LoginOutcome::NoMatch { attempts }
            }
        }
    }

    /// Current failure count for an identifier, 0 when clean
    pub fn attempts(&self, email: &str) -> u32 {
        self.throttle.attempts(email)
    }

    #[cfg(test)]
    pub(crate) fn throttle(&self) -> &LoginThrottle {
        &self.throttle
    }
}
