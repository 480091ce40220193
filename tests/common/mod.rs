#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Response};
use chrono::Utc;
use society_portal::{
    AppConfig, AppState, MockStorageService, create_router,
    error::RepositoryError,
    models::{
        Admin, CarouselSlide, ContactSubmission, CreateCarouselSlideRequest,
        CreateContactSubmissionRequest, CreatePartnerRequest, Partner, UpdatePartnerRequest,
    },
    repository::{Repository, RepositoryState},
};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-signing-secret-42";
pub const TEST_ADMIN_ID: Uuid = Uuid::from_u128(0xA11CE);
pub const TEST_ADMIN_EMAIL: &str = "secretary@society.test";
pub const TEST_ADMIN_PASSWORD: &str = "correct horse battery staple";

// --- In-memory repository ---

/// Repository double backed by vectors. `lookup_delay` slows `get_admin`
/// down to exercise the lookup timeout; `lookup_fails` makes it error out
/// the way an unreachable database does.
#[derive(Default)]
pub struct InMemoryRepository {
    pub admins: Mutex<Vec<Admin>>,
    pub partners: Mutex<Vec<Partner>>,
    pub slides: Mutex<Vec<CarouselSlide>>,
    pub contacts: Mutex<Vec<ContactSubmission>>,
    pub lookup_delay: Option<Duration>,
    pub lookup_fails: bool,
}

impl InMemoryRepository {
    pub fn with_admin(admin: Admin) -> Self {
        let repo = Self::default();
        repo.admins.lock().unwrap().push(admin);
        repo
    }

    pub fn remove_admin(&self, id: Uuid) {
        self.admins.lock().unwrap().retain(|a| a.id != id);
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, RepositoryError> {
        if let Some(delay) = self.lookup_delay {
            tokio::time::sleep(delay).await;
        }
        if self.lookup_fails {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn get_admin_by_email(&self, email: &str) -> Option<Admin> {
        self.admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
    }

    async fn list_partners(&self) -> Vec<Partner> {
        self.partners.lock().unwrap().clone()
    }

    async fn create_partner(&self, req: CreatePartnerRequest) -> Option<Partner> {
        let partner = Partner {
            id: Uuid::new_v4(),
            name: req.name,
            logo_key: req.logo_key,
            website_url: req.website_url,
            position: req.position,
            created_at: Utc::now(),
        };
        self.partners.lock().unwrap().push(partner.clone());
        Some(partner)
    }

    async fn update_partner(&self, id: Uuid, req: UpdatePartnerRequest) -> Option<Partner> {
        let mut partners = self.partners.lock().unwrap();
        let partner = partners.iter_mut().find(|p| p.id == id)?;
        if let Some(name) = req.name {
            partner.name = name;
        }
        if let Some(logo_key) = req.logo_key {
            partner.logo_key = logo_key;
        }
        if let Some(url) = req.website_url {
            partner.website_url = Some(url);
        }
        if let Some(position) = req.position {
            partner.position = position;
        }
        Some(partner.clone())
    }

    async fn delete_partner(&self, id: Uuid) -> bool {
        let mut partners = self.partners.lock().unwrap();
        let before = partners.len();
        partners.retain(|p| p.id != id);
        partners.len() != before
    }

    async fn list_carousel_slides(&self) -> Vec<CarouselSlide> {
        let mut slides = self.slides.lock().unwrap().clone();
        slides.sort_by_key(|s| s.position);
        slides
    }

    async fn create_carousel_slide(
        &self,
        req: CreateCarouselSlideRequest,
    ) -> Option<CarouselSlide> {
        let slide = CarouselSlide {
            id: Uuid::new_v4(),
            title: req.title,
            image_key: req.image_key,
            link_url: req.link_url,
            position: req.position,
            created_at: Utc::now(),
        };
        self.slides.lock().unwrap().push(slide.clone());
        Some(slide)
    }

    async fn delete_carousel_slide(&self, id: Uuid) -> bool {
        let mut slides = self.slides.lock().unwrap();
        let before = slides.len();
        slides.retain(|s| s.id != id);
        slides.len() != before
    }

    async fn create_contact_submission(
        &self,
        req: CreateContactSubmissionRequest,
    ) -> Option<ContactSubmission> {
        let submission = ContactSubmission {
            id: Uuid::new_v4(),
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
            created_at: Utc::now(),
        };
        self.contacts.lock().unwrap().push(submission.clone());
        Some(submission)
    }

    async fn list_contact_submissions(&self) -> Vec<ContactSubmission> {
        self.contacts.lock().unwrap().clone()
    }
}

// --- Fixtures ---

pub fn test_admin() -> Admin {
    Admin {
        id: TEST_ADMIN_ID,
        email: TEST_ADMIN_EMAIL.to_string(),
        name: "Dr. Ada Secretary".to_string(),
        password_hash: society_portal::auth::hash_password(TEST_ADMIN_PASSWORD).unwrap(),
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        auth_secret: TEST_SECRET.to_string(),
        ..AppConfig::default()
    }
}

pub fn test_state(repo: Arc<InMemoryRepository>) -> AppState {
    test_state_with_storage(repo, MockStorageService::new())
}

pub fn test_state_with_storage(
    repo: Arc<InMemoryRepository>,
    storage: MockStorageService,
) -> AppState {
    AppState::new(test_config(), repo as RepositoryState, Arc::new(storage)).unwrap()
}

pub fn test_app(repo: Arc<InMemoryRepository>) -> Router {
    create_router(test_state(repo))
}

/// Cookie header value carrying a fresh credential for `admin_id`.
pub fn auth_cookie(state: &AppState, admin_id: Uuid) -> String {
    let credential = state.auth.tokens().issue(admin_id).unwrap();
    format!("auth-token={}", credential.token)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
