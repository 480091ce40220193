use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints open to anonymous visitors of the society website.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Landing page.
        .route("/", get(handlers::home_page))
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /api/carousel
        // Landing-page slides, readable without a session.
        .route("/api/carousel", get(handlers::list_carousel_slides))
        // POST /api/contact
        // Public contact form.
        .route("/api/contact", post(handlers::submit_contact))
}
