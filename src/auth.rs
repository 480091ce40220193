use std::time::Duration;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{ApiError, AuthError},
    models::Admin,
    repository::RepositoryState,
    token::TokenService,
};

/// Name of the cookie carrying the signed credential.
pub const AUTH_COOKIE: &str = "auth-token";

/// Session
///
/// The runtime identity of an authenticated administrator, rebuilt on every
/// request from a valid credential plus a live `admins` row. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<Admin> for Session {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            name: admin.name,
        }
    }
}

/// Session Extractor
///
/// Hands handlers the `Session` the request gate resolved and stored in the
/// request extensions. Handlers never look at the cookie themselves.
///
/// Rejection: 401 if the route was not behind the gate (no Session attached).
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(ApiError::Unauthorized(AuthError::MissingCredential))
    }
}

/// Authenticator
///
/// Composes credential verification with the administrator lookup.
pub struct Authenticator {
    tokens: TokenService,
    repo: RepositoryState,
    lookup_timeout: Duration,
}

impl Authenticator {
    pub fn new(tokens: TokenService, repo: RepositoryState, lookup_timeout: Duration) -> Self {
        Self {
            tokens,
            repo,
            lookup_timeout,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// resolve_session
    ///
    /// Succeeds only if the credential verifies AND its subject still resolves
    /// to an administrator. A slow or failing lookup yields `LookupUnavailable`;
    /// it never grants access.
    pub async fn resolve_session(&self, token: &str) -> Result<Session, AuthError> {
        let admin_id = self.tokens.verify(token)?;

        match tokio::time::timeout(self.lookup_timeout, self.repo.get_admin(admin_id)).await {
            Ok(Ok(Some(admin))) => Ok(Session::from(admin)),
            Ok(Ok(None)) => Err(AuthError::UnknownSubject),
            Ok(Err(e)) => {
                tracing::error!(%admin_id, "admin lookup failed: {}", e);
                Err(AuthError::LookupUnavailable)
            }
            Err(_) => {
                tracing::error!(%admin_id, timeout = ?self.lookup_timeout, "admin lookup timed out");
                Err(AuthError::LookupUnavailable)
            }
        }
    }

    /// Resolves the Session carried by the request's `auth-token` cookie.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Session, AuthError> {
        let token = read_auth_cookie(headers).ok_or(AuthError::MissingCredential)?;
        self.resolve_session(token).await
    }
}

/// read_auth_cookie
///
/// Finds the `auth-token` value across all `Cookie` headers. Blank values count as absent.
pub fn read_auth_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that stores a freshly issued credential.
pub fn session_cookie(token: &str, max_age: Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value instructing the client to discard its credential.
pub fn clear_session_cookie() -> String {
    format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Hashes a password into an argon2 PHC string for the `admins` table.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Checks a password against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("stored password hash is not a valid PHC string: {}", e);
            false
        }
    }
}
