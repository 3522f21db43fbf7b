use utoipa::OpenApi;

use super::handlers::{auth, health};
use crate::session::{Role, SessionClaims};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "habilita",
        description = "Session authentication for the transport licensing back office"
    ),
    paths(
        auth::login,
        auth::inspector_login,
        auth::logout,
        auth::session,
        health::health
    ),
    components(schemas(
        auth::LoginRequest,
        auth::InspectorLoginRequest,
        auth::SessionResponse,
        auth::ErrorResponse,
        health::Health,
        SessionClaims,
        Role
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_auth_routes() {
        let doc = openapi();
        for path in [
            "/api/auth/login",
            "/api/auth/inspector/login",
            "/api/auth/logout",
            "/api/auth/session",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
