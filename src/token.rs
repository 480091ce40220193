//! Token Service: issues and verifies the signed `auth-token` credential.
//!
//! Credentials are HS256 JSON Web Tokens. The service holds nothing but the
//! signing keys and the credential lifetime, so a single instance is shared by
//! every request without coordination.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::ConfigError,
    error::{AuthError, TokenError},
};

/// Longest credential lifetime the service accepts (one year).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// Claims
///
/// Payload embedded in every credential.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the administrator id.
    pub sub: Uuid,
    /// Issued At (iat), unix seconds.
    pub iat: i64,
    /// Expiration Time (exp), unix seconds. The credential is valid strictly before this instant.
    pub exp: i64,
}

/// Credential
///
/// An issued token together with the facts it encodes. Immutable once issued.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Opaque value placed in the `auth-token` cookie.
    pub token: String,
    pub subject: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// TokenService
///
/// Issues and verifies credentials with a server-only secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    /// Builds the service. A blank secret, or a lifetime that is zero, longer
    /// than `MAX_TOKEN_TTL` or past the end of the calendar, is a configuration
    /// error and must stop the process before it serves anything.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::Empty("AUTH_SECRET"));
        }
        let invalid_ttl = || ConfigError::Invalid {
            var: "AUTH_TOKEN_TTL_HOURS",
            value: format!("{ttl:?}"),
        };
        if ttl.is_zero() || ttl > MAX_TOKEN_TTL {
            return Err(invalid_ttl());
        }
        let ttl = chrono::Duration::from_std(ttl).map_err(|_| invalid_ttl())?;
        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(invalid_ttl());
        }

        // Expiry is checked in `verify_at` against an explicit clock, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Credential lifetime, as configured.
    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or_default()
    }

    /// Issues a credential for `subject`, valid for the configured lifetime.
    pub fn issue(&self, subject: Uuid) -> Result<Credential, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Credential, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: subject,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(Credential {
            token,
            subject,
            issued_at: now,
            expires_at,
        })
    }

    /// Verifies a credential against the current wall clock and returns its subject.
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies signature integrity, then expiry relative to `now`.
    ///
    /// The HMAC comparison happens inside the `jsonwebtoken` crypto backend,
    /// which does not short-circuit on the first mismatching byte.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::TamperedCredential,
                ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
                _ => AuthError::MalformedCredential,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(AuthError::ExpiredCredential);
        }

        Ok(data.claims.sub)
    }
}
