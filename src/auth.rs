use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{
    config::AppConfig,
    models::{Role, RoleSet, Session, SessionState},
};

/// Claims
///
/// The payload expected inside a session credential (HS256 JWT). Credentials are issued by
/// the external auth service; this crate only validates them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's id as issued by the auth service (an opaque string,
    /// e.g. a document id).
    pub sub: String,
    /// Display name, used as the sender name in connection requests.
    #[serde(default)]
    pub name: String,
    /// Raw role strings. Unknown values are dropped when the session is built.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration Time (exp), seconds since the epoch. Always validated.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

impl Claims {
    /// into_session
    ///
    /// Converts validated claims into a `Session`. Role strings outside the closed `Role`
    /// enumeration are logged and ignored; they never map to a capability.
    pub fn into_session(self) -> Session {
        let mut roles = RoleSet::empty();
        for raw in &self.roles {
            match raw.parse::<Role>() {
                Ok(role) => roles.insert(role),
                Err(e) => tracing::warn!(user_id = %self.sub, "ignoring credential role: {}", e),
            }
        }

        Session {
            user_id: self.sub,
            name: self.name,
            roles,
            expires_at: DateTime::<Utc>::from_timestamp(self.exp as i64, 0).unwrap_or_default(),
        }
    }
}

/// session_from_token
///
/// Validates a credential and resolves it to a session state. Every failure (bad signature,
/// malformed token, expiry) resolves to `Unauthenticated`: a bad credential is the same as
/// no credential, and is not an error worth surfacing.
pub fn session_from_token(token: &str, secret: &str) -> SessionState {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => SessionState::Authenticated(data.claims.into_session()),
        Err(e) => {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("session credential expired"),
                _ => tracing::debug!("rejected session credential: {:?}", e.kind()),
            }
            SessionState::Unauthenticated
        }
    }
}

/// credential_from_parts
///
/// Finds the raw credential on a request: an `Authorization: Bearer` header wins, otherwise
/// the session cookie is used.
pub fn credential_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// SessionState Extractor
///
/// Resolves the request's session from its credential. Never rejects: a missing or invalid
/// credential yields `Unauthenticated`, and the access guard decides what that means for
/// the requested route.
impl<S> FromRequestParts<S> for SessionState
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let Some(token) = credential_from_parts(parts, &config.session_cookie_name) else {
            return Ok(SessionState::Unauthenticated);
        };

        Ok(session_from_token(&token, &config.jwt_secret))
    }
}

/// Credential
///
/// The raw credential of the request, forwarded to the directory backend so calls are made
/// on the user's behalf.
#[derive(Debug, Clone)]
pub struct Credential(pub Option<String>);

impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);
        Ok(Credential(credential_from_parts(
            parts,
            &config.session_cookie_name,
        )))
    }
}

/// AuthContext
///
/// The process-wide owner of the session for non-HTTP embeddings. Starts in `Loading`,
/// is hydrated once from a persisted credential, and is cleared on sign-out or expiry.
/// Every change is published to subscribers synchronously through a watch channel.
pub struct AuthContext {
    secret: String,
    state: watch::Sender<SessionState>,
}

impl AuthContext {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            secret: jwt_secret.into(),
            state,
        }
    }

    /// hydrate
    ///
    /// Initial resolution from whatever credential was persisted, if any.
    pub fn hydrate(&self, persisted: Option<&str>) -> SessionState {
        let next = match persisted {
            Some(token) => session_from_token(token, &self.secret),
            None => SessionState::Unauthenticated,
        };
        tracing::debug!(authenticated = next.session().is_some(), "session hydrated");
        self.publish(next)
    }

    pub fn sign_in(&self, token: &str) -> SessionState {
        let next = session_from_token(token, &self.secret);
        if let Some(session) = next.session() {
            tracing::info!(user_id = %session.user_id, "session started");
        }
        self.publish(next)
    }

    pub fn sign_out(&self) {
        tracing::info!("session cleared");
        self.publish(SessionState::Unauthenticated);
    }

    /// expire_if_stale
    ///
    /// Clears the session if its credential has expired at `now`. Returns whether it did.
    pub fn expire_if_stale(&self, now: DateTime<Utc>) -> bool {
        let expired = matches!(
            &*self.state.borrow(),
            SessionState::Authenticated(session) if session.is_expired_at(now)
        );
        if expired {
            tracing::info!("session expired");
            self.publish(SessionState::Unauthenticated);
        }
        expired
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// resolved
    ///
    /// Waits until the session has left `Loading` and returns the resolved state.
    pub async fn resolved(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let resolved = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => (*state).clone(),
            Err(_) => SessionState::Unauthenticated,
        };
        resolved
    }

    fn publish(&self, next: SessionState) -> SessionState {
        self.state.send_replace(next.clone());
        next
    }
}
