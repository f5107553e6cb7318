#![allow(dead_code)]

use alumni_portal::{
    AppConfig, AppState, BroadcastChannel, Navigator, auth::Claims, directory::DirectoryState,
    models::AlumniProfile, routes,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
/// Shaped like the document ids the auth service issues.
pub const TEST_USER_ID: &str = "65f0c2a1b4e8d9f3a7c1e2b4";

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Signs a credential the way the external auth service would.
/// `exp_offset` is relative to now; use a large negative value for an expired token
/// (validation allows a minute of leeway).
pub fn create_token_with_secret(name: &str, roles: &[&str], exp_offset: i64, secret: &str) -> String {
    let now = now_secs();
    let claims = Claims {
        sub: TEST_USER_ID.to_string(),
        name: name.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

pub fn create_token(name: &str, roles: &[&str]) -> String {
    create_token_with_secret(name, roles, 3600, TEST_JWT_SECRET)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    }
}

pub fn navigator() -> Navigator {
    Navigator::new(Arc::new(routes::app_routes().unwrap()))
}

pub fn create_app_state(directory: DirectoryState, realtime: BroadcastChannel) -> AppState {
    AppState {
        navigator: navigator(),
        directory,
        realtime: Arc::new(realtime),
        config: test_config(),
    }
}

pub fn profile(id: &str, name: &str, email: &str, roles: &[&str]) -> AlumniProfile {
    AlumniProfile {
        id: id.to_string(),
        name: name.to_string(),
        email: Some(email.to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        company: None,
        role_title: None,
    }
}

pub fn sample_profiles() -> Vec<AlumniProfile> {
    vec![
        profile("a1", "Grace Hopper", "grace@navy.mil", &["Alumni"]),
        profile("a2", "Alan Turing", "alan@bletchley.uk", &["Alumni", "Mentor"]),
        profile("m1", "Barbara Liskov", "liskov@mit.edu", &["Mentor"]),
        profile("s1", "Ada Student", "ada@uni.edu", &["Student"]),
    ]
}
