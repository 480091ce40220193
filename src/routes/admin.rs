use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Back-office pages and the content-management API. Every path here is
/// classified as protected by the gate: pages redirect to `/admin/login`,
/// API calls get a JSON 401.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // --- Pages ---
        .route("/admin", get(handlers::admin_dashboard))
        // The login page is special-cased by the gate (redirects away when signed in).
        .route("/admin/login", get(handlers::login_page))
        // --- Partners ---
        .route(
            "/api/partners",
            get(handlers::list_partners).post(handlers::create_partner),
        )
        .route(
            "/api/partners/{id}",
            put(handlers::update_partner).delete(handlers::delete_partner),
        )
        // --- Carousel ---
        .route("/api/admin/carousel", post(handlers::create_carousel_slide))
        .route(
            "/api/admin/carousel/{id}",
            delete(handlers::delete_carousel_slide),
        )
        // --- Contact inbox ---
        .route(
            "/api/admin/contact-submissions",
            get(handlers::list_contact_submissions),
        )
        // --- Uploads ---
        // Presigned object-store URL for logos, slide images and resources.
        .route("/api/upload/presigned", post(handlers::get_presigned_url))
}
