use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Session;

// --- Core Application Schemas (Mapped to Database) ---

/// Admin
///
/// A back-office account from the `admins` table. The password hash is an
/// argon2 PHC string and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Partner
///
/// An organisation shown in the partners section of the public site.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    // Object-store key of the uploaded logo.
    pub logo_key: String,
    pub website_url: Option<String>,
    pub position: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// CarouselSlide
///
/// One slide of the landing-page carousel.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct CarouselSlide {
    pub id: Uuid,
    pub title: String,
    pub image_key: String,
    pub link_url: Option<String>,
    pub position: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ContactSubmission
///
/// A message left through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Body of `POST /api/auth/login`. The password is only compared against the
/// stored hash and never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePartnerRequest {
    pub name: String,
    pub logo_key: String,
    pub website_url: Option<String>,
    #[serde(default)]
    pub position: i32,
}

/// UpdatePartnerRequest
///
/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePartnerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCarouselSlideRequest {
    pub title: String,
    pub image_key: String,
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateContactSubmissionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// UploadFolder
///
/// Top-level prefix an uploaded object is stored under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UploadFolder {
    Partners,
    Carousel,
    #[default]
    Resources,
}

impl UploadFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFolder::Partners => "partners",
            UploadFolder::Carousel => "carousel",
            UploadFolder::Resources => "resources",
        }
    }
}

/// PresignedUploadRequest
///
/// Input for `POST /api/upload/presigned`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PresignedUploadRequest {
    /// Original filename, used to derive the extension.
    #[schema(example = "annual_report.pdf")]
    pub filename: String,
    /// MIME type the upload is constrained to. Images and PDF only.
    #[schema(example = "application/pdf")]
    pub file_type: String,
    #[serde(default)]
    pub folder: UploadFolder,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PresignedUploadResponse {
    /// Time-limited URL for the client's PUT request.
    pub upload_url: String,
    /// Object key to store on the partner, slide or resource record.
    pub resource_key: String,
}

// --- Session Schemas (Output) ---

/// SessionResponse
///
/// Returned by a successful login and by session introspection:
/// `{"success": true, "admin": {"id", "email", "name"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub success: bool,
    pub admin: Session,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}
