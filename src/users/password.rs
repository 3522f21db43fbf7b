use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::OnceLock;
use tracing::warn;

const DUMMY_PASSWORD: &[u8] = b"habilita-sin-usuario";

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Hash of a throwaway password, built once with the default Argon2 parameters.
fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| {
            let salt = SaltString::encode_b64(b"habilita-dummy16").ok()?;
            Argon2::default()
                .hash_password(DUMMY_PASSWORD, &salt)
                .ok()
                .map(|hash| hash.to_string())
        })
        .as_deref()
}

/// Check `password` against an Argon2 PHC string.
///
/// An unparsable stored hash is logged and treated as a mismatch.
#[must_use]
pub fn verify_password(password: &str, phc: &str) -> bool {
    let parsed = match PasswordHash::new(phc) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("stored password hash is not a valid PHC string: {err}");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Spend one Argon2 verification for a login that matched no usable account.
///
/// Always `false`; the work keeps response time independent of whether the
/// account exists.
#[must_use]
pub fn verify_dummy_password(password: &str) -> bool {
    if let Some(phc) = dummy_hash() {
        let _ = verify_password(password, phc);
    }
    false
}
