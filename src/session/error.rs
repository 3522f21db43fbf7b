use thiserror::Error;

/// Reasons a presented session token is rejected.
///
/// These never leave the process: the request boundary reduces every variant to
/// "no session". They exist so the rejection can be logged and asserted in tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidSession {
    #[error("malformed session token: {0}")]
    Malformed(String),
    #[error("invalid session signature")]
    BadSignature,
    #[error("session expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for InvalidSession {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed(err.to_string()),
        }
    }
}

/// Failures while configuring the codec or minting a token.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session secret is missing or empty")]
    MissingSecret,
    #[error("failed to sign session token")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("session cookie is not a valid header value")]
    Cookie(#[from] axum::http::header::InvalidHeaderValue),
}
