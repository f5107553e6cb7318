use std::sync::Arc;

use axum::http::StatusCode;

use crate::{
    auth::AuthContext,
    guard::{AccessGuard, GuardDecision, RedirectReason},
    models::{PageId, SessionState},
    routes::{RouteParams, RouteResolution, RouteTable},
};

/// Which frame a rendered page goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chrome {
    /// Gated pages: rendered inside the dashboard shell.
    Shell,
    /// Public pages: rendered directly into the document.
    Bare,
}

/// Navigation
///
/// The result of resolving one path against the route table and the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render {
        page: PageId,
        params: RouteParams,
        chrome: Chrome,
    },
    Redirect {
        location: String,
        reason: RedirectReason,
    },
    /// No route matched; render the fallback page.
    NotFound { page: PageId },
    /// The route is gated and the session is still loading.
    Pending,
}

/// NavStatus
///
/// Result code for embeddings that do not speak HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStatus {
    Ok,
    Redirect,
    NotFound,
    Pending,
}

impl Navigation {
    pub fn status(&self) -> NavStatus {
        match self {
            Navigation::Render { .. } => NavStatus::Ok,
            Navigation::Redirect { .. } => NavStatus::Redirect,
            Navigation::NotFound { .. } => NavStatus::NotFound,
            Navigation::Pending => NavStatus::Pending,
        }
    }

    /// The pending view is a normal page as far as HTTP is concerned.
    pub fn http_status(&self) -> StatusCode {
        match self.status() {
            NavStatus::Ok | NavStatus::Pending => StatusCode::OK,
            NavStatus::Redirect => StatusCode::SEE_OTHER,
            NavStatus::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Navigator
///
/// Route table lookup followed, for gated routes, by the access guard. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Navigator {
    table: Arc<RouteTable>,
    guard: AccessGuard,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self::with_guard(table, AccessGuard::default())
    }

    pub fn with_guard(table: Arc<RouteTable>, guard: AccessGuard) -> Self {
        Self { table, guard }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// resolve
    ///
    /// Synchronous resolution against an already-known session state. Unmatched paths are
    /// `NotFound` whatever the session; gated paths go through the guard before anything
    /// about the page is produced.
    pub fn resolve(&self, path: &str, session: &SessionState) -> Navigation {
        let matched = match self.table.resolve(path) {
            RouteResolution::Matched(matched) => matched,
            RouteResolution::Fallback(page) => return Navigation::NotFound { page },
        };

        let Some(capabilities) = matched.descriptor.capabilities else {
            return Navigation::Render {
                page: matched.descriptor.page,
                params: matched.params,
                chrome: Chrome::Bare,
            };
        };

        match self.guard.decide(session, &capabilities) {
            GuardDecision::Render => Navigation::Render {
                page: matched.descriptor.page,
                params: matched.params,
                chrome: Chrome::Shell,
            },
            GuardDecision::Redirect { location, reason } => {
                tracing::debug!(path, ?reason, location = %location, "guard redirected navigation");
                Navigation::Redirect { location, reason }
            }
            GuardDecision::Pending => Navigation::Pending,
        }
    }

    /// navigate
    ///
    /// Resolves against the current session. Only a gated route that comes back `Pending`
    /// waits for the authentication context to leave `Loading`; public and unmatched paths
    /// never wait.
    pub async fn navigate(&self, path: &str, auth: &AuthContext) -> Navigation {
        match self.resolve(path, &auth.current()) {
            Navigation::Pending => {
                let session = auth.resolved().await;
                self.resolve(path, &session)
            }
            decided => decided,
        }
    }
}
