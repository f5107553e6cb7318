mod common;

use alumni_portal::{
    AppConfig, AppState, AuthContext, BroadcastChannel, MockDirectoryClient,
    auth::{Claims, Credential, session_from_token},
    models::{Role, SessionState},
};
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, Uri, header, request::Parts},
};
use chrono::{Duration, Utc};
use common::{TEST_JWT_SECRET, TEST_USER_ID, create_token, create_token_with_secret};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;

// --- Helper Functions ---

fn create_state(config: AppConfig) -> AppState {
    let mut state = common::create_app_state(
        Arc::new(MockDirectoryClient::default()),
        BroadcastChannel::default(),
    );
    state.config = config;
    state
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}

fn with_cookie(parts: &mut Parts, cookie: &str) {
    parts.headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(cookie).unwrap(),
    );
}

async fn extract_session(parts: &mut Parts, state: &AppState) -> SessionState {
    SessionState::from_request_parts(parts, state).await.unwrap()
}

// --- Request Extractors ---

#[tokio::test]
async fn test_session_from_valid_bearer() {
    let state = create_state(common::test_config());
    let token = create_token("Ada", &["Student"]);

    let mut parts = get_request_parts(Method::GET, "/dashboard".parse().unwrap());
    with_bearer(&mut parts, &token);

    let session = extract_session(&mut parts, &state).await;
    let session = session.session().expect("bearer token should authenticate");
    assert_eq!(session.user_id, TEST_USER_ID);
    assert_eq!(session.name, "Ada");
    assert!(session.roles.contains(Role::Student));
    assert_eq!(session.roles.len(), 1);
}

#[tokio::test]
async fn test_missing_credential_is_unauthenticated() {
    let state = create_state(common::test_config());
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    assert_eq!(
        extract_session(&mut parts, &state).await,
        SessionState::Unauthenticated
    );
    let Credential(raw) = Credential::from_request_parts(&mut parts, &state).await.unwrap();
    assert!(raw.is_none());
}

#[tokio::test]
async fn test_session_from_cookie() {
    let state = create_state(common::test_config());
    let token = create_token("Grace", &["Alumni"]);

    let mut parts = get_request_parts(Method::GET, "/alumni".parse().unwrap());
    with_cookie(&mut parts, &format!("theme=dark; token={}", token));

    let session = extract_session(&mut parts, &state).await;
    assert!(session.session().unwrap().roles.contains(Role::Alumni));
}

#[tokio::test]
async fn test_custom_cookie_name() {
    let state = create_state(AppConfig {
        session_cookie_name: "portal_session".to_string(),
        ..common::test_config()
    });
    let token = create_token("Grace", &["Alumni"]);

    let mut default_name = get_request_parts(Method::GET, "/".parse().unwrap());
    with_cookie(&mut default_name, &format!("token={}", token));
    assert_eq!(
        extract_session(&mut default_name, &state).await,
        SessionState::Unauthenticated
    );

    let mut custom_name = get_request_parts(Method::GET, "/".parse().unwrap());
    with_cookie(&mut custom_name, &format!("portal_session={}", token));
    assert!(extract_session(&mut custom_name, &state).await.session().is_some());
}

#[tokio::test]
async fn test_expired_token_is_unauthenticated() {
    let state = create_state(common::test_config());
    // Well past the validation leeway.
    let token = create_token_with_secret("Ada", &["Student"], -3600, TEST_JWT_SECRET);

    let mut parts = get_request_parts(Method::GET, "/dashboard".parse().unwrap());
    with_bearer(&mut parts, &token);

    assert_eq!(
        extract_session(&mut parts, &state).await,
        SessionState::Unauthenticated
    );
}

#[tokio::test]
async fn test_wrong_secret_is_unauthenticated() {
    let state = create_state(common::test_config());
    let token = create_token_with_secret("Mallory", &["Admin"], 3600, "some-other-secret");

    let mut parts = get_request_parts(Method::GET, "/dashboard".parse().unwrap());
    with_bearer(&mut parts, &token);

    assert_eq!(
        extract_session(&mut parts, &state).await,
        SessionState::Unauthenticated
    );
}

#[tokio::test]
async fn test_bearer_wins_over_cookie() {
    let state = create_state(common::test_config());
    let token = create_token("Liskov", &["Mentor"]);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    with_bearer(&mut parts, &token);
    with_cookie(&mut parts, "token=not-a-jwt");

    let Credential(raw) = Credential::from_request_parts(&mut parts, &state).await.unwrap();
    assert_eq!(raw.as_deref(), Some(token.as_str()));
    assert!(extract_session(&mut parts, &state).await.session().is_some());
}

#[tokio::test]
async fn test_unknown_roles_are_dropped() {
    let state = create_state(common::test_config());
    let token = create_token("Eve", &["superuser", "mentor", "ALUMNI"]);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    with_bearer(&mut parts, &token);

    let session = extract_session(&mut parts, &state).await;
    let roles = session.session().unwrap().roles;
    assert_eq!(roles.to_vec(), vec![Role::Mentor, Role::Alumni]);
}

#[test]
fn test_document_id_subjects_authenticate() {
    let now = Utc::now().timestamp() as usize;
    for sub in [TEST_USER_ID, "42", "user:grace"] {
        let claims = Claims {
            sub: sub.to_string(),
            name: "Grace".to_string(),
            roles: vec!["Alumni".to_string()],
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap();

        let state = session_from_token(&token, TEST_JWT_SECRET);
        assert_eq!(state.session().map(|s| s.user_id.as_str()), Some(sub));
    }
}

#[test]
fn test_garbage_token_is_unauthenticated() {
    assert_eq!(
        session_from_token("definitely.not.ajwt", TEST_JWT_SECRET),
        SessionState::Unauthenticated
    );
}

// --- Authentication Context ---

#[test]
fn test_auth_context_lifecycle() {
    let auth = AuthContext::new(TEST_JWT_SECRET);
    assert!(auth.current().is_loading());

    let mut rx = auth.subscribe();

    auth.hydrate(None);
    assert_eq!(auth.current(), SessionState::Unauthenticated);
    assert!(rx.has_changed().unwrap());
    rx.mark_unchanged();

    let signed_in = auth.sign_in(&create_token("Ada", &["Student"]));
    assert!(signed_in.session().is_some());
    assert_eq!(auth.current(), signed_in);
    assert!(rx.has_changed().unwrap());
    rx.mark_unchanged();

    auth.sign_out();
    assert_eq!(auth.current(), SessionState::Unauthenticated);
    assert!(rx.has_changed().unwrap());
}

#[test]
fn test_auth_context_hydrates_from_persisted_credential() {
    let auth = AuthContext::new(TEST_JWT_SECRET);
    let state = auth.hydrate(Some(&create_token("Grace", &["Alumni"])));

    assert_eq!(state.session().unwrap().name, "Grace");
    assert_eq!(auth.current(), state);
}

#[test]
fn test_auth_context_expiry() {
    let auth = AuthContext::new(TEST_JWT_SECRET);
    auth.sign_in(&create_token("Ada", &["Student"]));

    assert!(!auth.expire_if_stale(Utc::now()));
    assert!(auth.current().session().is_some());

    assert!(auth.expire_if_stale(Utc::now() + Duration::hours(2)));
    assert_eq!(auth.current(), SessionState::Unauthenticated);

    // Nothing left to expire.
    assert!(!auth.expire_if_stale(Utc::now() + Duration::hours(2)));
}
