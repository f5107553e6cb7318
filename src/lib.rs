use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core: roles and sessions, the page route table, the access guard and the shell.
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod routes;
pub mod shell;
pub mod templates;

// HTTP edge and external collaborators.
pub mod directory;
pub mod errors;
pub mod handlers;
pub mod realtime;

// --- Public Re-exports ---

pub use auth::AuthContext;
pub use config::AppConfig;
pub use directory::{DirectoryState, HttpDirectoryClient, MockDirectoryClient};
pub use navigation::Navigator;
pub use realtime::{BroadcastChannel, RealtimeState};

/// ApiDoc
///
/// OpenAPI description of the JSON endpoints, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_session, handlers::get_routes, handlers::list_alumni,
        handlers::connect, handlers::logout
    ),
    components(
        schemas(
            models::Role, models::PageId, models::SessionStatus, models::SessionView,
            models::RouteManifestEntry, models::AlumniProfile, models::AlumniSearchResult,
            models::ConnectRequest, models::ConnectResponse, models::ConnectionNotice,
            errors::ErrorResponse,
        )
    ),
    tags(
        (name = "alumni-portal", description = "Alumni Network Portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, cloneable container of everything a request may need. Built once in `main`
/// (or in a test) and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Route table + access guard.
    pub navigator: Navigator,
    /// External alumni directory / chat backend.
    pub directory: DirectoryState,
    /// Realtime notification channel.
    pub realtime: RealtimeState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// The session extractors only need the configuration (cookie name, signing secret).
impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the HTTP surface: JSON endpoints under `/api`, the logout and shell controls,
/// and the page navigator as the fallback for every other path.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. JSON API. Endpoints that need a role check it themselves via `guard::authorize`.
    let api = Router::new()
        .route("/session", get(handlers::get_session))
        .route("/routes", get(handlers::get_routes))
        .route("/alumni", get(handlers::list_alumni))
        .route("/connect", post(handlers::connect));

    // 3. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(|| async { "ok" }))
        .route("/logout", post(handlers::logout))
        .route("/ui/sidebar", post(handlers::toggle_sidebar))
        .nest("/api", api)
        // Pages: route table -> access guard -> dashboard shell.
        .fallback(handlers::navigate_page)
        .with_state(state);

    // 4. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span so every log line of a request carries its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
