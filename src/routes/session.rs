use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Session Router Module
///
/// Login and logout are unprotected; `/api/auth/session` sits behind the gate
/// and answers 401 when there is no valid session.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::get_session))
}
