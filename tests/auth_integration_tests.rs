mod common;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, Method, Request, StatusCode, Uri, header, request::Parts},
    response::IntoResponse,
};
use common::{InMemoryRepository, TEST_ADMIN_ID, TEST_ADMIN_PASSWORD, TEST_SECRET, test_admin};
use society_portal::{
    Authenticator, Session, TokenService,
    auth::{
        AUTH_COOKIE, clear_session_cookie, hash_password, read_auth_cookie, session_cookie,
        verify_password,
    },
    error::AuthError,
    repository::RepositoryState,
};
use uuid::Uuid;

const TTL: Duration = Duration::from_secs(24 * 3600);

fn authenticator(repo: Arc<InMemoryRepository>, lookup_timeout: Duration) -> Authenticator {
    let tokens = TokenService::new(TEST_SECRET, TTL).unwrap();
    Authenticator::new(tokens, repo as RepositoryState, lookup_timeout)
}

fn cookie_headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
    headers
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

// --- resolve_session ---

#[tokio::test]
async fn test_resolve_session_with_valid_token() {
    let repo = Arc::new(InMemoryRepository::with_admin(test_admin()));
    let auth = authenticator(repo, Duration::from_secs(1));
    let token = auth.tokens().issue(TEST_ADMIN_ID).unwrap().token;

    let session = auth.resolve_session(&token).await.unwrap();

    assert_eq!(session.id, TEST_ADMIN_ID);
    assert_eq!(session.email, common::TEST_ADMIN_EMAIL);
    assert_eq!(session.name, "Dr. Ada Secretary");
}

#[tokio::test]
async fn test_resolve_session_fails_for_deleted_admin() {
    let repo = Arc::new(InMemoryRepository::with_admin(test_admin()));
    let auth = authenticator(repo.clone(), Duration::from_secs(1));
    let token = auth.tokens().issue(TEST_ADMIN_ID).unwrap().token;

    assert!(auth.resolve_session(&token).await.is_ok());

    repo.remove_admin(TEST_ADMIN_ID);

    // The token is still cryptographically valid, but the subject is gone.
    assert_eq!(auth.tokens().verify(&token), Ok(TEST_ADMIN_ID));
    assert_eq!(
        auth.resolve_session(&token).await,
        Err(AuthError::UnknownSubject)
    );
}

#[tokio::test]
async fn test_resolve_session_fails_closed_on_slow_lookup() {
    let repo = Arc::new(InMemoryRepository {
        lookup_delay: Some(Duration::from_secs(5)),
        ..InMemoryRepository::with_admin(test_admin())
    });
    let auth = authenticator(repo, Duration::from_millis(20));
    let token = auth.tokens().issue(TEST_ADMIN_ID).unwrap().token;

    assert_eq!(
        auth.resolve_session(&token).await,
        Err(AuthError::LookupUnavailable)
    );
}

#[tokio::test]
async fn test_resolve_session_fails_closed_when_store_errors() {
    let repo = Arc::new(InMemoryRepository {
        lookup_fails: true,
        ..InMemoryRepository::with_admin(test_admin())
    });
    let auth = authenticator(repo, Duration::from_secs(1));
    let token = auth.tokens().issue(TEST_ADMIN_ID).unwrap().token;

    // A database outage must not be reported as a deleted administrator.
    assert_eq!(
        auth.resolve_session(&token).await,
        Err(AuthError::LookupUnavailable)
    );
}

#[tokio::test]
async fn test_resolve_session_does_not_look_up_invalid_tokens() {
    // A lookup would hang for 5s; an invalid token must be rejected before it.
    let repo = Arc::new(InMemoryRepository {
        lookup_delay: Some(Duration::from_secs(5)),
        ..InMemoryRepository::with_admin(test_admin())
    });
    let auth = authenticator(repo, Duration::from_secs(10));

    let started = std::time::Instant::now();
    assert_eq!(
        auth.resolve_session("definitely.not.valid").await,
        Err(AuthError::MalformedCredential)
    );
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_authenticate_requires_cookie() {
    let repo = Arc::new(InMemoryRepository::with_admin(test_admin()));
    let auth = authenticator(repo, Duration::from_secs(1));

    assert_eq!(
        auth.authenticate(&HeaderMap::new()).await,
        Err(AuthError::MissingCredential)
    );
    assert_eq!(
        auth.authenticate(&cookie_headers("auth-token=")).await,
        Err(AuthError::MissingCredential)
    );

    let token = auth.tokens().issue(TEST_ADMIN_ID).unwrap().token;
    let headers = cookie_headers(&format!("theme=dark; auth-token={token}; lang=en"));
    assert_eq!(auth.authenticate(&headers).await.unwrap().id, TEST_ADMIN_ID);
}

#[tokio::test]
async fn test_authenticate_ignores_authorization_header() {
    let repo = Arc::new(InMemoryRepository::with_admin(test_admin()));
    let auth = authenticator(repo, Duration::from_secs(1));
    let token = auth.tokens().issue(TEST_ADMIN_ID).unwrap().token;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );

    assert_eq!(
        auth.authenticate(&headers).await,
        Err(AuthError::MissingCredential)
    );
}

// --- Cookies ---

#[test]
fn test_read_auth_cookie() {
    assert_eq!(read_auth_cookie(&cookie_headers("auth-token=abc.def.ghi")), Some("abc.def.ghi"));
    assert_eq!(read_auth_cookie(&cookie_headers("a=1;auth-token=xyz")), Some("xyz"));
    assert_eq!(read_auth_cookie(&cookie_headers("not-auth-token=xyz")), None);
    assert_eq!(read_auth_cookie(&cookie_headers("auth-token-old=xyz")), None);
    assert_eq!(read_auth_cookie(&HeaderMap::new()), None);

    let mut headers = HeaderMap::new();
    headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
    headers.append(header::COOKIE, HeaderValue::from_static("auth-token=second"));
    assert_eq!(read_auth_cookie(&headers), Some("second"));
}

#[test]
fn test_cookie_attributes() {
    let set = session_cookie("tok", TTL, false);
    assert!(set.starts_with(&format!("{AUTH_COOKIE}=tok;")));
    assert!(set.contains("HttpOnly"));
    assert!(set.contains("SameSite=Lax"));
    assert!(set.contains("Path=/"));
    assert!(set.contains("Max-Age=86400"));
    assert!(!set.contains("Secure"));

    assert!(session_cookie("tok", TTL, true).ends_with("; Secure"));

    let cleared = clear_session_cookie();
    assert!(cleared.starts_with("auth-token=;"));
    assert!(cleared.contains("Max-Age=0"));
}

// --- Session extractor ---

#[tokio::test]
async fn test_session_extractor_reads_gate_extension() {
    let mut parts = get_request_parts(Method::GET, "/admin".parse().unwrap());
    let session = Session {
        id: Uuid::from_u128(3),
        email: "x@society.test".to_string(),
        name: "X".to_string(),
    };
    parts.extensions.insert(session.clone());

    let extracted = Session::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(extracted, session);
}

#[tokio::test]
async fn test_session_extractor_rejects_without_gate() {
    let mut parts = get_request_parts(Method::GET, "/admin".parse().unwrap());

    // A raw cookie alone is not enough; handlers only trust the gate's Session.
    parts.headers.insert(
        header::COOKIE,
        HeaderValue::from_static("auth-token=whatever"),
    );

    let rejection = Session::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(rejection.into_response().status(), StatusCode::UNAUTHORIZED);
}

// --- Passwords ---

#[test]
fn test_password_hash_round_trip() {
    let hash = hash_password(TEST_ADMIN_PASSWORD).unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(TEST_ADMIN_PASSWORD, &hash));
    assert!(!verify_password("wrong password", &hash));
    assert!(!verify_password(TEST_ADMIN_PASSWORD, "not-a-phc-string"));
}
