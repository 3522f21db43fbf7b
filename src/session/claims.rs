//! Identity payload carried inside the session token.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

/// Roles known to the back office.
///
/// Authorization by role happens in the handlers that need it; the session core
/// only carries the value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Inspector,
    Lector,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Inspector => "inspector",
            Self::Lector => "lector",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "inspector" => Ok(Self::Inspector),
            "lector" => Ok(Self::Lector),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Claims describing the authenticated principal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub nombre: String,
    pub rol: Role,
    /// Badge number, only present for sessions opened through the inspector login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legajo: Option<String>,
}

/// Full token payload: the session claims plus the registered time claims.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    #[serde(flatten)]
    pub session: SessionClaims,
    pub iat: i64,
    pub exp: i64,
}
