//! Login, logout and session introspection.
//!
//! These routes live under `/api/auth`, which the request gate never inspects.
//! Failures never say which part of the credentials was wrong.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    session::{Role, SessionClaims, SessionCodec},
    users::{verify_dummy_password, verify_password, StoreError, UserRecord, UserStore},
};

const INVALID_CREDENTIALS: &str = "credenciales_invalidas";

#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Deserialize)]
pub struct InspectorLoginRequest {
    legajo: String,
    password: String,
}

impl std::fmt::Debug for InspectorLoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectorLoginRequest")
            .field("legajo", &self.legajo)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub user: SessionClaims,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Check the password of a looked-up user off the async runtime.
///
/// Missing and inactive accounts still run one Argon2 verification so the
/// response time does not reveal whether the account exists.
async fn check_credentials(
    user: Option<UserRecord>,
    password: String,
) -> Result<UserRecord, Response> {
    let user = user.filter(|user| user.activo);
    let hash = user.as_ref().map(|user| user.password_hash.clone());

    let verified = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_dummy_password(&password),
    })
    .await;

    match (verified, user) {
        (Ok(true), Some(user)) => Ok(user),
        (Ok(_), _) => Err(error_response(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS)),
        (Err(err), _) => {
            error!("password verification task failed: {err}");
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

fn lookup_failed(err: &StoreError) -> Response {
    match err {
        // the row needs fixing in the database
        StoreError::UnknownRole { id, role } => {
            error!(user_id = id, rol = %role, "user has a role outside admin/inspector/lector");
        }
        StoreError::Database(source) => error!("failed to look up user: {source}"),
    }
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

/// Mint the session cookie and answer with the session claims.
fn open_session(codec: &SessionCodec, claims: SessionClaims) -> Response {
    match codec.create_session(&claims) {
        Ok(cookie) => {
            info!(user_id = claims.user_id, rol = %claims.rol, "login");
            (
                StatusCode::OK,
                [(SET_COOKIE, cookie)],
                Json(SessionResponse { user: claims }),
            )
                .into_response()
        }
        Err(err) => {
            error!("failed to create session: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened; `session` cookie set", body = SessionResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(codec, users))]
pub async fn login(
    codec: Extension<Arc<SessionCodec>>,
    users: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "solicitud_invalida");
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) || request.password.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "solicitud_invalida");
    }

    let user = match users.find_by_email(&email).await {
        Ok(user) => user,
        Err(err) => return lookup_failed(&err),
    };

    match check_credentials(user, request.password).await {
        Ok(user) => open_session(&codec, user.session_claims()),
        Err(response) => {
            warn!("rejected login");
            response
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/inspector/login",
    request_body = InspectorLoginRequest,
    responses(
        (status = 200, description = "Inspector session opened; `session` cookie set", body = SessionResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or not an inspector", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(codec, users))]
pub async fn inspector_login(
    codec: Extension<Arc<SessionCodec>>,
    users: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<InspectorLoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "solicitud_invalida");
    };

    let legajo = request.legajo.trim();
    if legajo.is_empty() || request.password.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "solicitud_invalida");
    }

    let user = match users.find_by_legajo(legajo).await {
        Ok(user) => user.filter(|user| user.rol == Role::Inspector),
        Err(err) => return lookup_failed(&err),
    };

    match check_credentials(user, request.password).await {
        Ok(user) => open_session(&codec, user.inspector_claims()),
        Err(response) => {
            warn!("rejected inspector login");
            response
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
pub async fn logout(codec: Extension<Arc<SessionCodec>>) -> impl IntoResponse {
    // Always clear, whether or not a session was present.
    (StatusCode::NO_CONTENT, [(SET_COOKIE, codec.delete_session())])
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is active", body = SessionResponse),
        (status = 204, description = "No active session")
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, codec: Extension<Arc<SessionCodec>>) -> Response {
    match codec.get_session(&headers) {
        Some(user) => (StatusCode::OK, Json(SessionResponse { user })).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
