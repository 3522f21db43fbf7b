//! # Habilita (session authentication core)
//!
//! Back-office authentication for the municipal transport licensing office.
//!
//! ## Sessions
//!
//! A successful login mints an HS256 token with the principal's identity
//! (`userId`, `email`, `nombre`, `rol`, optional `legajo`) that expires 24 hours
//! after issue. The token travels in the `session` cookie (`HttpOnly`,
//! `SameSite=Lax`, `Secure` in production). Nothing is stored server-side.
//!
//! ## Request gate
//!
//! Every request goes through [`gate::enforce`] before reaching a handler:
//! protected routes without a valid session are sent to
//! `/login?error=acceso_denegado`, guest-only routes with a valid session are
//! sent to `/panel`, and the auth API, static assets and images are never
//! inspected.
//!
//! The signing secret is mandatory; the server refuses to start without it.

pub mod cli;
pub mod gate;
pub mod habilita;
pub mod session;
pub mod users;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
