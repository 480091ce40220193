use std::sync::Arc;

use axum::{
    Router,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod storage;
pub mod token;

pub mod routes;
use routes::{admin, public, session};

// --- Public Re-exports ---

pub use auth::{Authenticator, Session};
pub use config::{AppConfig, ConfigError};
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};
pub use token::TokenService;

/// ApiDoc
///
/// OpenAPI document for the JSON API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout, handlers::get_session,
        handlers::list_carousel_slides, handlers::submit_contact,
        handlers::list_partners, handlers::create_partner, handlers::update_partner,
        handlers::delete_partner, handlers::create_carousel_slide,
        handlers::delete_carousel_slide, handlers::list_contact_submissions,
        handlers::get_presigned_url
    ),
    components(
        schemas(
            models::Partner, models::CarouselSlide, models::ContactSubmission,
            models::LoginRequest, models::CreatePartnerRequest, models::UpdatePartnerRequest,
            models::CreateCarouselSlideRequest, models::CreateContactSubmissionRequest,
            models::UploadFolder, models::PresignedUploadRequest, models::PresignedUploadResponse,
            models::SessionResponse, models::LogoutResponse, error::ErrorBody, auth::Session,
        )
    ),
    tags(
        (name = "society-portal", description = "Society website and back-office API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a request may need, assembled once at startup and shared
/// read-only across requests.
#[derive(Clone)]
pub struct AppState {
    pub repo: RepositoryState,
    pub storage: StorageState,
    pub config: AppConfig,
    /// Token Service + administrator lookup, used by the gate and the login handler.
    pub auth: Arc<Authenticator>,
}

impl AppState {
    /// Builds the state, constructing the Token Service from `config`.
    /// Fails if the signing secret is unusable.
    pub fn new(
        config: AppConfig,
        repo: RepositoryState,
        storage: StorageState,
    ) -> Result<Self, ConfigError> {
        let tokens = TokenService::new(&config.auth_secret, config.token_ttl)?;
        let auth = Authenticator::new(tokens, repo.clone(), config.admin_lookup_timeout);

        Ok(Self {
            repo,
            storage,
            config,
            auth: Arc::new(auth),
        })
    }
}

/// create_router
///
/// Assembles all routes, wraps them in the request gate, then adds the
/// observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(session::session_routes())
        .merge(admin::admin_routes())
        // Unmatched paths still pass through the gate, so protected prefixes
        // never leak a 404 to anonymous callers.
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), gate::enforce))
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for every request, correlated by the `x-request-id` header.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
