//! Back-office user lookup for the login handlers.

mod password;
mod pg;

pub use self::password::{verify_dummy_password, verify_password};
pub use self::pg::PgUserStore;

#[cfg(test)]
pub(crate) use self::password::tests::hash as test_password_hash;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::{Role, SessionClaims};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] sqlx::Error),
    #[error("user {id} has an unknown role: {role}")]
    UnknownRole { id: i64, role: String },
}

#[derive(Clone, Debug)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub nombre: String,
    pub rol: Role,
    pub legajo: Option<String>,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub activo: bool,
}

impl UserRecord {
    /// Claims for a session opened with email and password.
    #[must_use]
    pub fn session_claims(&self) -> SessionClaims {
        SessionClaims {
            user_id: self.id,
            email: self.email.clone(),
            nombre: self.nombre.clone(),
            rol: self.rol,
            legajo: None,
        }
    }

    /// Claims for a session opened through the inspector badge login.
    #[must_use]
    pub fn inspector_claims(&self) -> SessionClaims {
        SessionClaims {
            legajo: self.legajo.clone(),
            ..self.session_claims()
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a user by badge number.
    async fn find_by_legajo(&self, legajo: &str) -> Result<Option<UserRecord>, StoreError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    fn inspector() -> UserRecord {
        UserRecord {
            id: 9,
            email: "insp@habilita.gob.ar".to_string(),
            nombre: "Inspector Nueve".to_string(),
            rol: Role::Inspector,
            legajo: Some("909".to_string()),
            password_hash: String::new(),
            activo: true,
        }
    }

    #[test]
    fn email_sessions_do_not_carry_legajo() {
        let claims = inspector().session_claims();
        assert_eq!(claims.user_id, 9);
        assert_eq!(claims.rol, Role::Inspector);
        assert_eq!(claims.legajo, None);
    }

    #[test]
    fn inspector_sessions_carry_legajo() {
        let claims = inspector().inspector_claims();
        assert_eq!(claims.legajo.as_deref(), Some("909"));
        assert_eq!(claims.email, "insp@habilita.gob.ar");
    }
}
