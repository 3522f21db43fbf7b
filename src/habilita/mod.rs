//! HTTP server: routes, shared context and the gate wiring.

pub mod handlers;
mod openapi;

pub use openapi::{openapi, ApiDoc};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    gate::{self, GateState, RouteRules},
    session::SessionCodec,
    users::{PgUserStore, UserStore},
};

/// Everything the handlers share for the life of the process.
///
/// Built once at startup and torn down with [`AppContext::shutdown`].
#[derive(Clone)]
pub struct AppContext {
    codec: Arc<SessionCodec>,
    users: Arc<dyn UserStore>,
    pool: Option<PgPool>,
}

impl AppContext {
    /// Build a context over an arbitrary user store (no database handle to close).
    pub fn new(codec: SessionCodec, users: Arc<dyn UserStore>) -> Self {
        Self {
            codec: Arc::new(codec),
            users,
            pool: None,
        }
    }

    /// Connect to Postgres and build the production context.
    ///
    /// # Errors
    /// Returns an error if the database cannot be reached.
    pub async fn connect(dsn: &str, codec: SessionCodec) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self {
            codec: Arc::new(codec),
            users: Arc::new(PgUserStore::new(pool.clone())),
            pool: Some(pool),
        })
    }

    #[must_use]
    pub fn codec(&self) -> &Arc<SessionCodec> {
        &self.codec
    }

    /// Close the database pool, waiting for checked-out connections.
    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}

/// Build the application router with the request gate in front of every route.
pub fn router(context: &AppContext, rules: RouteRules) -> Router {
    let gate_state = GateState::new(rules, context.codec.clone());

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/login", get(handlers::login_page))
        .route("/panel", get(handlers::panel))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/inspector/login", post(handlers::inspector_login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::session))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(gate_state, gate::enforce))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(context.codec.clone()))
                .layer(Extension(context.users.clone())),
        )
}

/// Start the server and block until Ctrl-C / SIGTERM, then close the context.
///
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn new(port: u16, context: AppContext) -> Result<()> {
    let app = router(&context, RouteRules::default());

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully shutdown");

    context.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!("failed to listen for SIGTERM: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        session::{Role, SESSION_COOKIE_NAME},
        users::{memory::MemoryUserStore, test_password_hash, UserRecord},
    };
    use axum::http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        StatusCode,
    };
    use secrecy::SecretString;
    use tower::ServiceExt;

    fn context() -> AppContext {
        let codec =
            SessionCodec::new(&SecretString::from("router-test-secret".to_string()), false)
                .unwrap();
        let users = MemoryUserStore {
            users: vec![UserRecord {
                id: 11,
                email: "admin@habilita.gob.ar".to_string(),
                nombre: "Admin".to_string(),
                rol: Role::Admin,
                legajo: None,
                password_hash: test_password_hash("clave"),
                activo: true,
            }],
        };
        AppContext::new(codec, Arc::new(users))
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn login_flow_through_the_gate() {
        let app = router(&context(), RouteRules::default());

        // anonymous visit to the panel bounces to login
        let response = app.clone().oneshot(get_request("/panel", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/login?error=acceso_denegado"
        );

        // the auth API is reachable without a session
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"admin@habilita.gob.ar","password":"clave"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=")));

        // with the cookie the panel opens and the login page bounces back
        let response = app
            .clone()
            .oneshot(get_request("/panel", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get_request("/login", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/panel");
    }

    #[tokio::test]
    async fn unknown_panel_routes_are_still_gated() {
        let app = router(&context(), RouteRules::default());
        let response = app.oneshot(get_request("/panel/obleas", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn health_and_docs_bypass_the_gate() {
        let app = router(&context(), RouteRules::default());
        let response = app.clone().oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/api-docs/openapi.json", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn shutdown_without_pool_is_a_noop() {
        context().shutdown().await;
    }
}
