//! Signed, time-limited session tokens and the cookie that carries them.
//!
//! Tokens are self-contained: validity is decided by the HS256 signature and
//! the `exp` claim only. There is no server-side session table, so a token
//! cannot be revoked before it expires; logout only clears the cookie.

mod claims;
mod codec;
mod cookie;
mod error;

pub use self::claims::{Role, SessionClaims, UnknownRole};
pub use self::codec::{SessionCodec, SessionVerifier};
pub use self::cookie::{extract_session_token, SESSION_COOKIE_NAME};
pub use self::error::{InvalidSession, SessionError};

use std::time::{SystemTime, UNIX_EPOCH};

/// Lifetime of a session token and of its cookie.
pub const SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Current unix time in seconds.
#[must_use]
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}
