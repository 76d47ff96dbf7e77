//! Authentication path: hashing, session tokens, attempt throttling
//!
//! # Components
//!
//! - [`password`] - Argon2id hashing with the filler-hash compare for
//!   absent accounts
//! - [`session`] - opaque HMAC-signed session tokens
//! - [`throttle`] - per-identifier failed-attempt accounting and lockout
//! - [`login`] - the login gate combining all three

pub mod login;
pub mod password;
pub mod session;
pub mod throttle;

pub use login::{AuthenticatedSession, LoginOutcome, LoginService};
pub use password::{hash_secret, matches_or_filler, secret_matches, FILLER_HASH};
pub use session::{SessionClaims, TokenError, TokenSigner};
pub use throttle::{LoginThrottle, ThrottleConfig, ThrottleStatus};
