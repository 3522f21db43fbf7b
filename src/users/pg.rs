use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::instrument;

use super::{StoreError, UserRecord, UserStore};

const SELECT_USER: &str = r"
    SELECT id::int8 AS id, email, nombre, rol, legajo, password_hash, activo
    FROM usuarios
";

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    let id: i64 = row.try_get("id")?;
    let role: String = row.try_get("rol")?;
    let rol = role
        .parse()
        .map_err(|_| StoreError::UnknownRole { id, role })?;

    Ok(UserRecord {
        id,
        email: row.try_get("email")?,
        nombre: row.try_get("nombre")?,
        rol,
        legajo: row.try_get("legajo")?,
        password_hash: row.try_get("password_hash")?,
        activo: row.try_get("activo")?,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = format!("{SELECT_USER} WHERE lower(email) = $1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_legajo(&self, legajo: &str) -> Result<Option<UserRecord>, StoreError> {
        let query = format!("{SELECT_USER} WHERE legajo = $1");
        let row = sqlx::query(&query)
            .bind(legajo)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }
}
