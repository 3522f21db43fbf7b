//! Request gate: per-request authentication boundary.
//!
//! Every request is classified on its own; there is no state carried between
//! requests. A token that fails verification for any reason is treated exactly
//! like a missing cookie.

mod rules;

pub use self::rules::{RouteClass, RouteRules, ACCESS_DENIED_QUERY, LOGIN_PATH, PANEL_PATH};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use crate::session::{extract_session_token, now_unix, SessionVerifier};

/// Terminal action for one request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GateDecision {
    RedirectToLogin(String),
    RedirectToPanel(String),
    PassThrough,
}

/// Decide what to do with a classified request.
#[must_use]
pub fn decide(rules: &RouteRules, class: RouteClass, authenticated: bool) -> GateDecision {
    match (class, authenticated) {
        (RouteClass::Protected, false) => GateDecision::RedirectToLogin(rules.login_redirect()),
        (RouteClass::GuestOnly, true) => {
            GateDecision::RedirectToPanel(rules.panel_path().to_string())
        }
        _ => GateDecision::PassThrough,
    }
}

#[derive(Clone)]
pub struct GateState {
    rules: Arc<RouteRules>,
    verifier: Arc<dyn SessionVerifier>,
}

impl GateState {
    pub fn new(rules: RouteRules, verifier: Arc<dyn SessionVerifier>) -> Self {
        Self {
            rules: Arc::new(rules),
            verifier,
        }
    }

    /// Classify `path` and resolve authentication from the raw cookie token.
    fn evaluate(&self, path: &str, token: Option<&str>) -> GateDecision {
        let class = self.rules.classify(path);
        if class == RouteClass::Excluded {
            return GateDecision::PassThrough;
        }

        let authenticated = token.is_some_and(|token| {
            self.verifier
                .verify(token, now_unix())
                .map_err(|err| debug!("gate: session rejected: {err}"))
                .is_ok()
        });

        decide(&self.rules, class, authenticated)
    }
}

/// axum middleware enforcing the gate; install with
/// `axum::middleware::from_fn_with_state(gate_state, gate::enforce)`.
pub async fn enforce(State(gate): State<GateState>, request: Request, next: Next) -> Response {
    let token = extract_session_token(request.headers());
    let decision = gate.evaluate(request.uri().path(), token.as_deref());

    match decision {
        GateDecision::RedirectToLogin(location) | GateDecision::RedirectToPanel(location) => {
            debug!(path = request.uri().path(), %location, "gate redirect");
            Redirect::temporary(&location).into_response()
        }
        GateDecision::PassThrough => next.run(request).await,
    }
}
