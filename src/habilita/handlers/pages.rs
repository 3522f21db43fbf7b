//! Entry points the gate routes visitors to. Rendering lives in the frontend;
//! these only answer with the minimum the browser flow needs.

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::SessionResponse;
use crate::{
    gate::{ACCESS_DENIED_QUERY, LOGIN_PATH},
    session::SessionCodec,
};

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "No encontrado")
}

pub async fn root() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    error: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> String {
    match query.error.as_deref() {
        Some("acceso_denegado") => {
            "Ingreso al sistema. Debe iniciar sesión para acceder al panel.".to_string()
        }
        _ => "Ingreso al sistema.".to_string(),
    }
}

/// Panel root. The gate has already admitted the request; the session is read
/// again to hand the caller its identity.
pub async fn panel(headers: HeaderMap, codec: Extension<Arc<SessionCodec>>) -> Response {
    match codec.get_session(&headers) {
        Some(user) => Json(SessionResponse { user }).into_response(),
        // expired between the gate and here
        None => Redirect::temporary(&format!("{LOGIN_PATH}?{ACCESS_DENIED_QUERY}")).into_response(),
    }
}
