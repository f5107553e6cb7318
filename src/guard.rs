use crate::{
    errors::ApiError,
    models::{CapabilitySet, Session, SessionState},
};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where signed-in users without a matching role are sent.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// GuardOutcome
///
/// The four possible decisions for one navigation into a gated subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The session holds at least one allowed role: render the nested subtree.
    Render,
    /// No session at all.
    RedirectToLogin,
    /// A session exists but none of its roles is allowed (including an empty role set).
    RedirectToUnauthorized,
    /// The session is still resolving; show a neutral loading state and decide later.
    Pending,
}

/// evaluate
///
/// The access decision, as a pure function of the session and the route's capability set.
/// An empty role set or an empty capability set never grants access.
pub fn evaluate(session: &SessionState, allowed: &CapabilitySet) -> GuardOutcome {
    match session {
        SessionState::Loading => GuardOutcome::Pending,
        SessionState::Unauthenticated => GuardOutcome::RedirectToLogin,
        SessionState::Authenticated(session) if session.roles.intersects(allowed) => {
            GuardOutcome::Render
        }
        SessionState::Authenticated(_) => GuardOutcome::RedirectToUnauthorized,
    }
}

/// Why a navigation was redirected away from a gated route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    LoginRequired,
    Unauthorized,
}

/// GuardDecision
///
/// `GuardOutcome` with the redirect destination filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect {
        location: String,
        reason: RedirectReason,
    },
    Pending,
}

/// AccessGuard
///
/// Binds the redirect destinations to the pure `evaluate` decision.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    pub login_path: String,
    pub unauthorized_path: String,
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self {
            login_path: LOGIN_PATH.to_string(),
            unauthorized_path: UNAUTHORIZED_PATH.to_string(),
        }
    }
}

impl AccessGuard {
    pub fn decide(&self, session: &SessionState, allowed: &CapabilitySet) -> GuardDecision {
        match evaluate(session, allowed) {
            GuardOutcome::Render => GuardDecision::Render,
            GuardOutcome::Pending => GuardDecision::Pending,
            GuardOutcome::RedirectToLogin => GuardDecision::Redirect {
                location: self.login_path.clone(),
                reason: RedirectReason::LoginRequired,
            },
            GuardOutcome::RedirectToUnauthorized => GuardDecision::Redirect {
                location: self.unauthorized_path.clone(),
                reason: RedirectReason::Unauthorized,
            },
        }
    }
}

/// authorize
///
/// The same decision for JSON endpoints, which answer with status codes instead of redirects.
/// A request never observes a loading session over HTTP, but if one appears it is treated
/// as unauthenticated rather than let through.
pub fn authorize<'a>(
    session: &'a SessionState,
    allowed: &CapabilitySet,
) -> Result<&'a Session, ApiError> {
    match (evaluate(session, allowed), session.session()) {
        (GuardOutcome::Render, Some(session)) => Ok(session),
        (GuardOutcome::RedirectToUnauthorized, _) => Err(ApiError::Forbidden),
        _ => Err(ApiError::Unauthenticated),
    }
}
