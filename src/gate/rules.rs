//! Static path classification for the request gate.

/// How the gate treats a request path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteClass {
    /// Never inspected: auth API, static assets, images, docs.
    Excluded,
    /// Requires an authenticated session.
    Protected,
    /// Only for visitors without a session (the login page).
    GuestOnly,
    /// Everything else.
    Public,
}

const DEFAULT_PROTECTED: &[&str] = &["/panel"];
const DEFAULT_GUEST_ONLY: &[&str] = &["/login"];
const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "/api/auth",
    "/static",
    "/assets",
    "/health",
    "/swagger-ui",
    "/api-docs",
];
const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];

pub const LOGIN_PATH: &str = "/login";
pub const PANEL_PATH: &str = "/panel";
pub const ACCESS_DENIED_QUERY: &str = "error=acceso_denegado";

#[derive(Clone, Debug)]
pub struct RouteRules {
    protected: Vec<String>,
    guest_only: Vec<String>,
    excluded_prefixes: Vec<String>,
    image_extensions: Vec<String>,
    login_path: String,
    panel_path: String,
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            protected: to_owned(DEFAULT_PROTECTED),
            guest_only: to_owned(DEFAULT_GUEST_ONLY),
            excluded_prefixes: to_owned(DEFAULT_EXCLUDED_PREFIXES),
            image_extensions: to_owned(DEFAULT_IMAGE_EXTENSIONS),
            login_path: LOGIN_PATH.to_string(),
            panel_path: PANEL_PATH.to_string(),
        }
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

impl RouteRules {
    #[must_use]
    pub fn with_protected(mut self, prefixes: &[&str]) -> Self {
        self.protected = to_owned(prefixes);
        self
    }

    #[must_use]
    pub fn with_guest_only(mut self, prefixes: &[&str]) -> Self {
        self.guest_only = to_owned(prefixes);
        self
    }

    #[must_use]
    pub fn with_excluded_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.excluded_prefixes = to_owned(prefixes);
        self
    }

    /// Where unauthenticated visitors of protected routes are sent.
    #[must_use]
    pub fn login_redirect(&self) -> String {
        format!("{}?{ACCESS_DENIED_QUERY}", self.login_path)
    }

    /// Where authenticated visitors of guest-only routes are sent.
    #[must_use]
    pub fn panel_path(&self) -> &str {
        &self.panel_path
    }

    fn is_excluded(&self, path: &str) -> bool {
        if self
            .excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return true;
        }

        // Only the last segment decides whether this is an image file.
        let file = path.rsplit('/').next().unwrap_or(path);
        file.rsplit_once('.').is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && self
                    .image_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }

    /// Classify a request path. Exclusion wins over every other rule, then
    /// protected, then guest-only.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_excluded(path) {
            RouteClass::Excluded
        } else if self
            .protected
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            RouteClass::Protected
        } else if self
            .guest_only
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            RouteClass::GuestOnly
        } else {
            RouteClass::Public
        }
    }
}
