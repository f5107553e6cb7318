use crate::{
    AppState,
    auth::Credential,
    errors::ApiError,
    guard,
    models::{
        AlumniSearchResult, ChatRequestPayload, ConnectRequest, ConnectResponse,
        ConnectionNotice, RoleSet, RouteManifestEntry, SessionState, SessionView,
    },
    navigation::{Chrome, Navigation},
    pages::{self, document},
    routes::{RouteParams, normalize_path},
    shell::{DashboardShell, SIDEBAR_COOKIE},
};
use axum::{
    Form, Json,
    extract::{Query, State},
    http::{Method, StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

// --- Filter Structs ---

/// AlumniFilter
///
/// Query parameters of `GET /api/alumni`. A blank or missing query lists the default alumni set.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AlumniFilter {
    /// Name or email fragment.
    pub query: Option<String>,
}

/// SidebarToggle
///
/// Form posted by the shell's menu control.
#[derive(Deserialize)]
pub struct SidebarToggle {
    pub return_to: Option<String>,
}

// --- Page Navigation ---

/// navigate_page
///
/// [Fallback] Every path without an explicit API route is a page navigation: the route table
/// picks the page, the access guard gates it, and gated pages are framed by the dashboard
/// shell. Unmatched paths render the fallback page with a 404. Pages are only served for
/// GET and HEAD.
pub async fn navigate_page(
    State(state): State<AppState>,
    session: SessionState,
    jar: CookieJar,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
        )
            .into_response();
    }

    let path = normalize_path(uri.path());
    let navigation = state.navigator.resolve(&path, &session);

    match render_navigation(navigation, &path, &session, &jar) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(path = %path, "page rendering failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Turns a navigation into its HTTP response: a redirect, or a full HTML document.
fn render_navigation(
    navigation: Navigation,
    path: &str,
    session: &SessionState,
    jar: &CookieJar,
) -> Result<Response, minijinja::Error> {
    let status = navigation.http_status();

    let (title, inner) = match navigation {
        Navigation::Redirect { location, .. } => {
            return Ok(Redirect::to(&location).into_response());
        }
        Navigation::Render {
            page,
            params,
            chrome,
        } => {
            let view = pages::render_page(page, &params, session.session())?;
            let inner = match chrome {
                Chrome::Shell => {
                    DashboardShell::from_cookie(jar.get(SIDEBAR_COOKIE).map(|c| c.value()))
                        .render(path, &view.body)?
                }
                Chrome::Bare => view.body,
            };
            (view.title, inner)
        }
        Navigation::NotFound { page } => {
            tracing::debug!(path = %path, "no route matched");
            let view = pages::render_page(page, &RouteParams::default(), None)?;
            (view.title, view.body)
        }
        Navigation::Pending => {
            let view = pages::loading_view()?;
            (view.title, view.body)
        }
    };

    Ok((status, Html(document(title, &inner)?)).into_response())
}

// --- Session & Routing Introspection ---

/// get_session
///
/// [Public Route] The session resolved from the request's credential.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Resolved session", body = SessionView))
)]
pub async fn get_session(session: SessionState) -> Json<SessionView> {
    Json(SessionView::from(&session))
}

/// get_routes
///
/// [Public Route] The page route table: patterns, pages and required roles.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route manifest", body = [RouteManifestEntry]))
)]
pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteManifestEntry>> {
    Json(state.navigator.table().manifest())
}

// --- Alumni Network ---

/// list_alumni
///
/// [Authenticated Route] Lists the alumni directory, or searches it when `query` is not blank.
/// Any signed-in role may use it.
#[utoipa::path(
    get,
    path = "/api/alumni",
    params(AlumniFilter),
    responses(
        (status = 200, description = "Directory entries", body = AlumniSearchResult),
        (status = 401, description = "No session"),
        (status = 502, description = "Directory unavailable")
    )
)]
pub async fn list_alumni(
    session: SessionState,
    Credential(credential): Credential,
    State(state): State<AppState>,
    Query(filter): Query<AlumniFilter>,
) -> Result<Json<AlumniSearchResult>, ApiError> {
    guard::authorize(&session, &RoleSet::all())?;

    let query = filter.query.as_deref().map(str::trim).unwrap_or_default();
    let users = if query.is_empty() {
        state.directory.list_alumni(credential.as_deref()).await
    } else {
        state.directory.search(credential.as_deref(), query).await
    }
    .map_err(ApiError::Search)?;

    Ok(Json(AlumniSearchResult {
        success: true,
        users,
    }))
}

/// connect
///
/// [Authenticated Route] Sends a connection (chat) request to another user. Once the chat
/// backend accepts it, a `send_request` notice is emitted on the realtime channel. A
/// rejection is answered with 409 and no notice is emitted.
#[utoipa::path(
    post,
    path = "/api/connect",
    request_body = ConnectRequest,
    responses(
        (status = 200, description = "Request sent", body = ConnectResponse),
        (status = 401, description = "No session"),
        (status = 409, description = "Rejected, e.g. a request is already pending"),
        (status = 502, description = "Directory unavailable")
    )
)]
pub async fn connect(
    session_state: SessionState,
    Credential(credential): Credential,
    State(state): State<AppState>,
    Json(payload): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let session = guard::authorize(&session_state, &RoleSet::all())?;

    let request = ChatRequestPayload {
        receiver_id: payload.receiver_id.clone(),
        topic: format!("Connection Request from {}", session.name),
    };
    state
        .directory
        .request_chat(credential.as_deref(), request)
        .await
        .map_err(ApiError::Connect)?;

    state.realtime.send_request(ConnectionNotice {
        receiver_id: payload.receiver_id.clone(),
        sender_name: session.name.clone(),
    });

    tracing::info!(
        sender = %session.user_id,
        receiver_id = %payload.receiver_id,
        "connection request sent"
    );

    Ok(Json(ConnectResponse {
        success: true,
        message: format!("Request sent to {}!", payload.receiver_name),
    }))
}

// --- Session Teardown & Shell State ---

/// logout
///
/// Clears the session cookie and sends the browser to the login page.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 303, description = "Redirect to /login"))
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build((state.config.session_cookie_name.clone(), "")).path("/"));
    (jar, Redirect::to(guard::LOGIN_PATH))
}

/// toggle_sidebar
///
/// Flips the shell's side panel and returns to the page the control was clicked on.
/// Only local paths are accepted as the return target.
pub async fn toggle_sidebar(jar: CookieJar, Form(form): Form<SidebarToggle>) -> (CookieJar, Redirect) {
    let mut shell = DashboardShell::from_cookie(jar.get(SIDEBAR_COOKIE).map(|c| c.value()));
    shell.toggle();

    let cookie = Cookie::build((SIDEBAR_COOKIE, shell.cookie_value()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    let target = form
        .return_to
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/dashboard".to_string());

    (jar.add(cookie), Redirect::to(&target))
}

/// is_local_path
///
/// Guards the toggle's return target against open redirects (`//host`, `https://...`).
/// Browsers drop tabs and newlines from URLs, so `/\t/host` would become `//host`: any
/// control character disqualifies the path.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}
