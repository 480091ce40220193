//! Request gate: classifies every inbound request by path and enforces the
//! authentication requirement of its class before any handler runs.
//!
//! The route table is the only place that decides which paths are protected.
//! `classify` and `decide` are plain functions so the policy can be tested
//! without building a router.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    auth::{Session, clear_session_cookie},
    error::{ApiError, AuthError},
};

pub const LOGIN_PATH: &str = "/admin/login";
pub const ADMIN_HOME_PATH: &str = "/admin";

/// AccessClass
///
/// The partition of URL space the gate enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    /// Public site pages and assets. Never authenticated.
    Public,
    /// The admin login page; bounces already-authenticated visitors to the dashboard.
    LoginPage,
    /// Browser-navigated admin pages; failures redirect to the login page.
    ProtectedPage,
    /// Admin-only API; failures return a JSON 401.
    ProtectedApi,
    /// Public API endpoints, including login and logout themselves.
    UnprotectedApi,
}

/// Route table consulted by `classify`. Longest matching prefix wins; `/`
/// matches every path, so classification is total.
pub const ROUTE_TABLE: &[(&str, AccessClass)] = &[
    ("/", AccessClass::Public),
    ("/admin", AccessClass::ProtectedPage),
    ("/admin/login", AccessClass::LoginPage),
    ("/api", AccessClass::UnprotectedApi),
    ("/api/auth", AccessClass::ProtectedApi),
    ("/api/auth/login", AccessClass::UnprotectedApi),
    ("/api/auth/logout", AccessClass::UnprotectedApi),
    ("/api/admin", AccessClass::ProtectedApi),
    ("/api/partners", AccessClass::ProtectedApi),
    ("/api/upload", AccessClass::ProtectedApi),
];

/// Whether `path` lies under `prefix` on a segment boundary
/// (`/admin` covers `/admin` and `/admin/x`, but not `/administrators`).
fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// classify
///
/// Maps a request path to exactly one access class using `ROUTE_TABLE`.
pub fn classify(path: &str) -> AccessClass {
    ROUTE_TABLE
        .iter()
        .filter(|(prefix, _)| matches_prefix(path, prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, class)| *class)
        .unwrap_or(AccessClass::Public)
}

impl AccessClass {
    /// Classes for which the gate has to look at the credential at all.
    pub fn needs_authentication(&self) -> bool {
        matches!(
            self,
            AccessClass::LoginPage | AccessClass::ProtectedPage | AccessClass::ProtectedApi
        )
    }
}

/// Decision
///
/// What the gate does with a request once its class and authentication
/// outcome are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward unchanged.
    PassThrough,
    /// Forward with the resolved Session attached.
    Admit(Session),
    /// Authenticated visitor on the login page.
    RedirectToAdmin,
    /// Unauthenticated visitor on an admin page. `clear_cookie` is set when a
    /// stale credential was presented, so the client stops resending it. A
    /// failed lookup says nothing about the credential and keeps the cookie.
    RedirectToLogin { clear_cookie: bool },
    /// Unauthenticated API call.
    Reject(AuthError),
}

/// decide
///
/// The gate's contract per access class. `outcome` is `None` for classes that
/// are never authenticated.
pub fn decide(class: AccessClass, outcome: Option<Result<Session, AuthError>>) -> Decision {
    match (class, outcome) {
        (AccessClass::Public | AccessClass::UnprotectedApi, _) => Decision::PassThrough,
        (AccessClass::LoginPage, Some(Ok(_))) => Decision::RedirectToAdmin,
        (AccessClass::LoginPage, _) => Decision::PassThrough,
        (AccessClass::ProtectedPage | AccessClass::ProtectedApi, Some(Ok(session))) => {
            Decision::Admit(session)
        }
        (AccessClass::ProtectedPage, Some(Err(err))) => Decision::RedirectToLogin {
            clear_cookie: !matches!(
                err,
                AuthError::MissingCredential | AuthError::LookupUnavailable
            ),
        },
        (AccessClass::ProtectedPage, None) => Decision::RedirectToLogin {
            clear_cookie: false,
        },
        (AccessClass::ProtectedApi, Some(Err(err))) => Decision::Reject(err),
        (AccessClass::ProtectedApi, None) => Decision::Reject(AuthError::MissingCredential),
    }
}

/// enforce
///
/// Axum middleware wrapping the whole router. Authenticates at most once per
/// request and forwards the Session to handlers through the request extensions.
pub async fn enforce(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let class = classify(&path);

    let outcome = if class.needs_authentication() {
        Some(state.auth.authenticate(request.headers()).await)
    } else {
        None
    };

    if let Some(Err(err)) = &outcome {
        match err {
            AuthError::MissingCredential => {
                tracing::debug!(%path, ?class, "no credential presented")
            }
            _ => tracing::warn!(%path, ?class, reason = %err, kind = ?err, "authentication failed"),
        }
    }

    match decide(class, outcome) {
        Decision::PassThrough => next.run(request).await,
        Decision::Admit(session) => {
            tracing::debug!(%path, ?class, admin_id = %session.id, "request admitted");
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Decision::RedirectToAdmin => redirect(ADMIN_HOME_PATH),
        Decision::RedirectToLogin { clear_cookie } => {
            tracing::info!(%path, clear_cookie, "redirecting to login");
            let mut response = redirect(LOGIN_PATH);
            if clear_cookie {
                if let Ok(value) = HeaderValue::from_str(&clear_session_cookie()) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            response
        }
        Decision::Reject(err) => ApiError::Unauthorized(err).into_response(),
    }
}

fn redirect(location: &'static str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, HeaderValue::from_static(location))],
    )
        .into_response()
}
