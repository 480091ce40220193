use crate::{
    AppState,
    auth::{Session, clear_session_cookie, session_cookie, verify_password},
    error::{ApiError, ErrorBody},
    storage::upload_key,
    models::{
        CarouselSlide, ContactSubmission, CreateCarouselSlideRequest,
        CreateContactSubmissionRequest, CreatePartnerRequest, LoginRequest, LogoutResponse,
        Partner, PresignedUploadRequest, PresignedUploadResponse, SessionResponse,
        UpdatePartnerRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use uuid::Uuid;

const MAX_CONTACT_MESSAGE_LEN: usize = 5000;

// --- Session Handlers ---

/// login
///
/// [Unprotected API] Checks email + password against the `admins` table and,
/// on success, issues a credential into the `auth-token` cookie.
///
/// Unknown email and wrong password produce the same 401 so the response does
/// not reveal which administrator accounts exist.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let admin = state
        .repo
        .get_admin_by_email(&payload.email)
        .await
        .filter(|admin| verify_password(&payload.password, &admin.password_hash))
        .ok_or_else(|| {
            tracing::warn!("login rejected: invalid credentials");
            ApiError::InvalidCredentials
        })?;

    let tokens = state.auth.tokens();
    let credential = tokens.issue(admin.id).map_err(|e| {
        tracing::error!(admin_id = %admin.id, "cannot issue credential: {}", e);
        ApiError::Internal
    })?;

    tracing::info!(admin_id = %admin.id, expires_at = %credential.expires_at, "admin logged in");

    let cookie = session_cookie(
        &credential.token,
        tokens.ttl(),
        state.config.secure_cookies(),
    );
    let body = SessionResponse {
        success: true,
        admin: Session::from(admin),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

/// logout
///
/// [Unprotected API] Clears the cookie. Credentials are stateless, so there is
/// nothing to revoke server-side.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out", body = LogoutResponse))
)]
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(LogoutResponse { success: true }),
    )
}

/// get_session
///
/// [Protected API] Session introspection. The gate has already resolved the
/// Session; this only echoes it.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "No valid session", body = ErrorBody)
    )
)]
pub async fn get_session(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        admin: session,
    })
}

// --- Public API ---

/// list_carousel_slides
///
/// [Unprotected API] Slides for the landing page, in display order.
#[utoipa::path(
    get,
    path = "/api/carousel",
    responses((status = 200, description = "Carousel slides", body = [CarouselSlide]))
)]
pub async fn list_carousel_slides(State(state): State<AppState>) -> Json<Vec<CarouselSlide>> {
    Json(state.repo.list_carousel_slides().await)
}

/// submit_contact
///
/// [Unprotected API] Stores a contact-form message.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = CreateContactSubmissionRequest,
    responses(
        (status = 201, description = "Stored", body = ContactSubmission),
        (status = 400, description = "Invalid submission", body = ErrorBody)
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<CreateContactSubmissionRequest>,
) -> Result<(StatusCode, Json<ContactSubmission>), ApiError> {
    validate_contact(&payload)?;

    let submission = state
        .repo
        .create_contact_submission(payload)
        .await
        .ok_or(ApiError::Internal)?;

    tracing::info!(submission_id = %submission.id, "contact submission stored");
    Ok((StatusCode::CREATED, Json(submission)))
}

fn validate_contact(payload: &CreateContactSubmissionRequest) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Name, email and message are required".to_string(),
        ));
    }
    let email_ok = payload
        .email
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !email_ok {
        return Err(ApiError::BadRequest("A valid email is required".to_string()));
    }
    if payload.message.len() > MAX_CONTACT_MESSAGE_LEN {
        return Err(ApiError::BadRequest("Message is too long".to_string()));
    }
    Ok(())
}

// --- Pages ---

pub async fn home_page() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Society</title></head>\
         <body><h1>Welcome</h1></body></html>",
    )
}

/// login_page
///
/// [Login Page] Only reached by visitors without a valid session; the gate
/// redirects everyone else to the dashboard.
pub async fn login_page() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Admin login</title></head><body>\
         <form id=\"login\">\
         <input name=\"email\" type=\"email\" required>\
         <input name=\"password\" type=\"password\" required>\
         <button type=\"submit\">Sign in</button><p id=\"error\"></p></form>\
         <script>\
         document.getElementById('login').addEventListener('submit', async (e) => {\
           e.preventDefault();\
           const form = new FormData(e.target);\
           const res = await fetch('/api/auth/login', {method: 'POST',\
             headers: {'Content-Type': 'application/json'},\
             body: JSON.stringify({email: form.get('email'), password: form.get('password')})});\
           if (res.ok) { window.location.assign('/admin'); }\
           else { document.getElementById('error').textContent = (await res.json()).error; }\
         });\
         </script></body></html>",
    )
}

/// admin_dashboard
///
/// [Protected Page] Back-office landing page.
pub async fn admin_dashboard(session: Session) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><title>Admin</title></head>\
         <body><h1>Dashboard</h1><p>Signed in as {}</p></body></html>",
        escape_html(&session.name)
    ))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// --- Protected API: Partners ---

#[utoipa::path(
    get,
    path = "/api/partners",
    responses(
        (status = 200, description = "All partners", body = [Partner]),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn list_partners(_session: Session, State(state): State<AppState>) -> Json<Vec<Partner>> {
    Json(state.repo.list_partners().await)
}

#[utoipa::path(
    post,
    path = "/api/partners",
    request_body = CreatePartnerRequest,
    responses(
        (status = 201, description = "Created", body = Partner),
        (status = 400, description = "Invalid partner", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn create_partner(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<CreatePartnerRequest>,
) -> Result<(StatusCode, Json<Partner>), ApiError> {
    if payload.name.trim().is_empty() || payload.logo_key.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Partner name and logo are required".to_string(),
        ));
    }

    let partner = state
        .repo
        .create_partner(payload)
        .await
        .ok_or(ApiError::Internal)?;

    tracing::info!(admin_id = %session.id, partner_id = %partner.id, "partner created");
    Ok((StatusCode::CREATED, Json(partner)))
}

#[utoipa::path(
    put,
    path = "/api/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = UpdatePartnerRequest,
    responses(
        (status = 200, description = "Updated", body = Partner),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_partner(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePartnerRequest>,
) -> Result<Json<Partner>, ApiError> {
    let partner = state
        .repo
        .update_partner(id, payload)
        .await
        .ok_or(ApiError::NotFound)?;

    tracing::info!(admin_id = %session.id, partner_id = %id, "partner updated");
    Ok(Json(partner))
}

#[utoipa::path(
    delete,
    path = "/api/partners/{id}",
    params(("id" = Uuid, Path, description = "Partner ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_partner(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.repo.delete_partner(id).await {
        return Err(ApiError::NotFound);
    }
    tracing::info!(admin_id = %session.id, partner_id = %id, "partner deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- Protected API: Carousel & Contact ---

#[utoipa::path(
    post,
    path = "/api/admin/carousel",
    request_body = CreateCarouselSlideRequest,
    responses(
        (status = 201, description = "Created", body = CarouselSlide),
        (status = 400, description = "Invalid slide", body = ErrorBody)
    )
)]
pub async fn create_carousel_slide(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<CreateCarouselSlideRequest>,
) -> Result<(StatusCode, Json<CarouselSlide>), ApiError> {
    if payload.title.trim().is_empty() || payload.image_key.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Slide title and image are required".to_string(),
        ));
    }

    let slide = state
        .repo
        .create_carousel_slide(payload)
        .await
        .ok_or(ApiError::Internal)?;

    tracing::info!(admin_id = %session.id, slide_id = %slide.id, "carousel slide created");
    Ok((StatusCode::CREATED, Json(slide)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/carousel/{id}",
    params(("id" = Uuid, Path, description = "Slide ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_carousel_slide(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.repo.delete_carousel_slide(id).await {
        return Err(ApiError::NotFound);
    }
    tracing::info!(admin_id = %session.id, slide_id = %id, "carousel slide deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/contact-submissions",
    responses((status = 200, description = "Contact submissions, newest first", body = [ContactSubmission]))
)]
pub async fn list_contact_submissions(
    _session: Session,
    State(state): State<AppState>,
) -> Json<Vec<ContactSubmission>> {
    Json(state.repo.list_contact_submissions().await)
}

// --- Protected API: Uploads ---

/// get_presigned_url
///
/// [Protected API] Issues a 10-minute upload URL so the browser can PUT the
/// file straight to the object store. Only images and PDFs are accepted.
#[utoipa::path(
    post,
    path = "/api/upload/presigned",
    request_body = PresignedUploadRequest,
    responses(
        (status = 200, description = "URL", body = PresignedUploadResponse),
        (status = 400, description = "Unsupported file type", body = ErrorBody)
    )
)]
pub async fn get_presigned_url(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<PresignedUploadRequest>,
) -> Result<Json<PresignedUploadResponse>, ApiError> {
    let file_type = payload.file_type.trim();
    if !(file_type.starts_with("image/") || file_type == "application/pdf") {
        return Err(ApiError::BadRequest("Unsupported file type".to_string()));
    }

    let object_key = upload_key(payload.folder, &payload.filename);

    let upload_url = state
        .storage
        .get_presigned_upload_url(&object_key, file_type)
        .await
        .map_err(|e| {
            tracing::error!(admin_id = %session.id, "storage error: {}", e);
            ApiError::Internal
        })?;

    Ok(Json(PresignedUploadResponse {
        upload_url,
        resource_key: object_key,
    }))
}

/// Fallback for unmatched paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
