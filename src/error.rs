use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// AuthError
///
/// Every reason a request can fail to establish a Session. The Gate treats all
/// of them as "unauthenticated"; the variants exist so rejections can be told
/// apart in the logs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("no auth-token cookie presented")]
    MissingCredential,
    #[error("credential could not be parsed")]
    MalformedCredential,
    #[error("credential has expired")]
    ExpiredCredential,
    #[error("credential signature does not match")]
    TamperedCredential,
    #[error("credential subject no longer exists")]
    UnknownSubject,
    #[error("administrator lookup failed or timed out")]
    LookupUnavailable,
}

impl AuthError {
    /// The short machine-readable message returned to API clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "Authentication required",
            _ => "Invalid or expired token",
        }
    }
}

/// ErrorBody
///
/// JSON shape of every error response: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// ApiError
///
/// Handler-level failures. Rendered as a status code plus `ErrorBody`; no
/// internal detail ever reaches the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.public_message())]
    Unauthorized(AuthError),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// StorageError
///
/// Failures talking to the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid presigning configuration: {0}")]
    Presigning(String),
    #[error("object store request failed: {0}")]
    Request(String),
}

/// TokenError
///
/// Failures while signing a new credential. Only reachable through a broken
/// server setup, never through client input.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("credential expiry is out of range")]
    ExpiryOutOfRange,
    #[error("failed to sign credential: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// RepositoryError
///
/// The identity store could not answer. Distinct from "no such row".
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
