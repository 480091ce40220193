use crate::error::RepositoryError;
use crate::models::{
    Admin, CarouselSlide, ContactSubmission, CreateCarouselSlideRequest,
    CreateContactSubmissionRequest, CreatePartnerRequest, Partner, UpdatePartnerRequest,
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for every persistence operation, so handlers and the
/// session resolver never depend on Postgres directly. Apart from `get_admin`,
/// query failures are logged by the implementation and surface as `None`,
/// empty lists or `false`.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Administrators ---
    // Consulted on every gated request. `Err` means the store could not answer,
    // `Ok(None)` that the administrator does not exist.
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, RepositoryError>;
    // Lookup used by the login endpoint; email comparison is case-insensitive.
    async fn get_admin_by_email(&self, email: &str) -> Option<Admin>;

    // --- Partners ---
    async fn list_partners(&self) -> Vec<Partner>;
    async fn create_partner(&self, req: CreatePartnerRequest) -> Option<Partner>;
    async fn update_partner(&self, id: Uuid, req: UpdatePartnerRequest) -> Option<Partner>;
    async fn delete_partner(&self, id: Uuid) -> bool;

    // --- Carousel ---
    async fn list_carousel_slides(&self) -> Vec<CarouselSlide>;
    async fn create_carousel_slide(&self, req: CreateCarouselSlideRequest)
    -> Option<CarouselSlide>;
    async fn delete_carousel_slide(&self, id: Uuid) -> bool;

    // --- Contact form ---
    async fn create_contact_submission(
        &self,
        req: CreateContactSubmissionRequest,
    ) -> Option<ContactSubmission>;
    async fn list_contact_submissions(&self) -> Vec<ContactSubmission>;
}

/// RepositoryState
///
/// Shared handle to the persistence layer held in the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// `Repository` backed by the tables created by `migrations/`.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, email, name, password_hash FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn get_admin_by_email(&self, email: &str) -> Option<Admin> {
        sqlx::query_as::<_, Admin>(
            "SELECT id, email, name, password_hash FROM admins WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_admin_by_email error: {:?}", e);
            None
        })
    }

    async fn list_partners(&self) -> Vec<Partner> {
        sqlx::query_as::<_, Partner>(
            r#"
            SELECT id, name, logo_key, website_url, position, created_at
            FROM partners
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_partners error: {:?}", e);
            vec![]
        })
    }

    async fn create_partner(&self, req: CreatePartnerRequest) -> Option<Partner> {
        sqlx::query_as::<_, Partner>(
            r#"
            INSERT INTO partners (id, name, logo_key, website_url, position)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, logo_key, website_url, position, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.logo_key)
        .bind(req.website_url)
        .bind(req.position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_partner error: {:?}", e))
        .ok()
    }

    /// update_partner
    ///
    /// COALESCE keeps stored values for fields the request leaves out.
    async fn update_partner(&self, id: Uuid, req: UpdatePartnerRequest) -> Option<Partner> {
        sqlx::query_as::<_, Partner>(
            r#"
            UPDATE partners SET
                name = COALESCE($2, name),
                logo_key = COALESCE($3, logo_key),
                website_url = COALESCE($4, website_url),
                position = COALESCE($5, position)
            WHERE id = $1
            RETURNING id, name, logo_key, website_url, position, created_at
            "#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.logo_key)
        .bind(req.website_url)
        .bind(req.position)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_partner error: {:?}", e);
            None
        })
    }

    async fn delete_partner(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM partners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(result) => result.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_partner error: {:?}", e);
                false
            }
        }
    }

    async fn list_carousel_slides(&self) -> Vec<CarouselSlide> {
        sqlx::query_as::<_, CarouselSlide>(
            r#"
            SELECT id, title, image_key, link_url, position, created_at
            FROM carousel_slides
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_carousel_slides error: {:?}", e);
            vec![]
        })
    }

    async fn create_carousel_slide(
        &self,
        req: CreateCarouselSlideRequest,
    ) -> Option<CarouselSlide> {
        sqlx::query_as::<_, CarouselSlide>(
            r#"
            INSERT INTO carousel_slides (id, title, image_key, link_url, position)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, image_key, link_url, position, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.title)
        .bind(req.image_key)
        .bind(req.link_url)
        .bind(req.position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_carousel_slide error: {:?}", e))
        .ok()
    }

    async fn delete_carousel_slide(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM carousel_slides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(result) => result.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_carousel_slide error: {:?}", e);
                false
            }
        }
    }

    async fn create_contact_submission(
        &self,
        req: CreateContactSubmissionRequest,
    ) -> Option<ContactSubmission> {
        sqlx::query_as::<_, ContactSubmission>(
            r#"
            INSERT INTO contact_submissions (id, name, email, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, subject, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name)
        .bind(req.email)
        .bind(req.subject)
        .bind(req.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_contact_submission error: {:?}", e))
        .ok()
    }

    async fn list_contact_submissions(&self) -> Vec<ContactSubmission> {
        sqlx::query_as::<_, ContactSubmission>(
            r#"
            SELECT id, name, email, subject, message, created_at
            FROM contact_submissions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("list_contact_submissions error: {:?}", e);
            vec![]
        })
    }
}
