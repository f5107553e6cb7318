use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// never mutated afterwards; handlers and extractors pull it out of `AppState` via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and the fail-fast rules.
    pub env: Env,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // HMAC secret used to validate incoming session credentials (HS256 JWTs).
    pub jwt_secret: String,
    // Base URL of the alumni directory / chat REST backend, e.g. `http://localhost:4000/api`.
    pub directory_api_url: String,
    // Name of the cookie carrying the session credential.
    pub session_cookie_name: String,
}

/// Env
///
/// Defines the runtime context: local development or hardened production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";
const LOCAL_DIRECTORY_URL: &str = "http://localhost:4000/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_COOKIE_NAME: &str = "token";

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration used for test scaffolding. Requires no environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            directory_api_url: LOCAL_DIRECTORY_URL.to_string(),
            session_cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production when `AUTH_JWT_SECRET` or `DIRECTORY_API_URL` is missing, so the
    /// service never starts with a guessable signing secret or a dangling collaborator URL.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let session_cookie_name =
            env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string());

        match env {
            Env::Local => Self {
                env: Env::Local,
                bind_addr,
                jwt_secret: env::var("AUTH_JWT_SECRET")
                    .unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
                directory_api_url: env::var("DIRECTORY_API_URL")
                    .unwrap_or_else(|_| LOCAL_DIRECTORY_URL.to_string()),
                session_cookie_name,
            },
            Env::Production => Self {
                env: Env::Production,
                bind_addr,
                jwt_secret: env::var("AUTH_JWT_SECRET")
                    .expect("FATAL: AUTH_JWT_SECRET must be set in production."),
                directory_api_url: env::var("DIRECTORY_API_URL")
                    .expect("FATAL: DIRECTORY_API_URL required in prod"),
                session_cookie_name,
            },
        }
    }
}
