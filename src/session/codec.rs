//! HS256 session tokens.
//!
//! The codec is the single place where tokens are signed and verified. The
//! request gate reaches it through [`SessionVerifier`], so both paths share the
//! same validation rules.

use axum::http::{HeaderMap, HeaderValue};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::{
    claims::{SessionClaims, TokenClaims},
    cookie::{clear_session_cookie, extract_session_token, session_cookie},
    error::{InvalidSession, SessionError},
    now_unix, SESSION_TTL_SECONDS,
};

/// Capability to check a presented token.
///
/// Implementations must be pure with respect to `(token, secret, now)`.
pub trait SessionVerifier: Send + Sync {
    /// Validate signature, shape and expiry of `token` at instant `now` (unix seconds).
    ///
    /// # Errors
    /// Returns the reason the token is not acceptable.
    fn verify(&self, token: &str, now: i64) -> Result<SessionClaims, InvalidSession>;
}

#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    secure_cookie: bool,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("keys", &"***")
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

impl SessionCodec {
    /// Build a codec from the process signing secret.
    ///
    /// # Errors
    /// Returns [`SessionError::MissingSecret`] when the secret is empty.
    pub fn new(secret: &SecretString, secure_cookie: bool) -> Result<Self, SessionError> {
        let secret = secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(SessionError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock in `verify`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            secure_cookie,
        })
    }

    #[must_use]
    pub fn secure_cookie(&self) -> bool {
        self.secure_cookie
    }

    /// Sign `claims` as issued at `issued_at`, expiring 24 hours later.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn mint(&self, claims: &SessionClaims, issued_at: i64) -> Result<String, SessionError> {
        let payload = TokenClaims {
            session: claims.clone(),
            iat: issued_at,
            exp: issued_at + SESSION_TTL_SECONDS,
        };
        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(SessionError::Signing)
    }

    /// Mint a token for `claims` and return the `Set-Cookie` value carrying it.
    ///
    /// # Errors
    /// Returns an error if signing fails or the cookie is not a valid header.
    #[instrument(skip_all, fields(user_id = claims.user_id, rol = %claims.rol))]
    pub fn create_session(&self, claims: &SessionClaims) -> Result<HeaderValue, SessionError> {
        let token = self.mint(claims, now_unix())?;
        debug!("session issued");
        Ok(session_cookie(
            &token,
            SESSION_TTL_SECONDS,
            self.secure_cookie,
        )?)
    }

    /// Resolve the request's `session` cookie into claims.
    ///
    /// A missing cookie and a rejected token both yield `None`.
    pub fn get_session(&self, headers: &HeaderMap) -> Option<SessionClaims> {
        let token = extract_session_token(headers)?;
        match self.verify(&token, now_unix()) {
            Ok(claims) => Some(claims),
            Err(err) => {
                debug!("session rejected: {err}");
                None
            }
        }
    }

    /// `Set-Cookie` value that clears the session. Same output on every call.
    #[must_use]
    pub fn delete_session(&self) -> HeaderValue {
        clear_session_cookie(self.secure_cookie)
    }
}

impl SessionVerifier for SessionCodec {
    fn verify(&self, token: &str, now: i64) -> Result<SessionClaims, InvalidSession> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)?;
        if now >= data.claims.exp {
            return Err(InvalidSession::Expired);
        }
        Ok(data.claims.session)
    }
}
