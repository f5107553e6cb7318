use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::models::{
    AlumniListResponse, AlumniProfile, ChatRequestPayload, ChatRequestResponse,
    UserSearchResponse,
};

/// DirectoryError
///
/// Failures of the external alumni/chat backend. Surfaced to page-level code, which turns
/// them into a user-facing message; the routing and guarding core never sees them.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Network, TLS or body-decoding failure.
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with `success: false` or a non-2xx status.
    #[error(
        "directory rejected the request: {}",
        .message.as_deref().unwrap_or("no reason given")
    )]
    Rejected { message: Option<String> },
}

// 1. DirectoryClient Contract
/// DirectoryClient
///
/// The alumni directory, search and chat-request endpoints, as consumed by the alumni page.
/// Every call forwards the caller's credential so the backend acts on the user's behalf.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// `GET /auth/alumni`: the default listing shown before any search.
    async fn list_alumni(
        &self,
        credential: Option<&str>,
    ) -> Result<Vec<AlumniProfile>, DirectoryError>;

    /// `GET /auth/search?query=`: users matching a name or email fragment.
    async fn search(
        &self,
        credential: Option<&str>,
        query: &str,
    ) -> Result<Vec<AlumniProfile>, DirectoryError>;

    /// `POST /chat/request`: asks `receiver_id` to open a chat.
    async fn request_chat(
        &self,
        credential: Option<&str>,
        request: ChatRequestPayload,
    ) -> Result<(), DirectoryError>;
}

// 2. The Real Implementation (HTTP)
/// HttpDirectoryClient
///
/// reqwest-backed client for the directory backend rooted at `base_url`
/// (e.g. `http://localhost:4000/api`).
#[derive(Clone)]
pub struct HttpDirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_credential(builder: RequestBuilder, credential: Option<&str>) -> RequestBuilder {
        match credential {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// send_json
///
/// Sends the request and decodes the JSON envelope. Non-2xx responses become `Rejected`,
/// carrying the backend's `message` when the body has one.
async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, DirectoryError> {
    let response = builder.send().await?;
    let status = response.status();

    if !status.is_success() {
        let message = response
            .json::<ChatRequestResponse>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(%status, "directory backend returned an error status");
        return Err(DirectoryError::Rejected { message });
    }

    Ok(response.json::<T>().await?)
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn list_alumni(
        &self,
        credential: Option<&str>,
    ) -> Result<Vec<AlumniProfile>, DirectoryError> {
        let builder = Self::with_credential(self.client.get(self.url("/auth/alumni")), credential);
        let body: AlumniListResponse = send_json(builder).await?;
        if !body.success {
            return Err(DirectoryError::Rejected {
                message: body.message,
            });
        }
        Ok(body.alumni)
    }

    async fn search(
        &self,
        credential: Option<&str>,
        query: &str,
    ) -> Result<Vec<AlumniProfile>, DirectoryError> {
        let builder = self
            .client
            .get(self.url("/auth/search"))
            .query(&[("query", query)]);
        let body: UserSearchResponse = send_json(Self::with_credential(builder, credential)).await?;
        if !body.success {
            return Err(DirectoryError::Rejected {
                message: body.message,
            });
        }
        Ok(body.users)
    }

    async fn request_chat(
        &self,
        credential: Option<&str>,
        request: ChatRequestPayload,
    ) -> Result<(), DirectoryError> {
        let builder = self.client.post(self.url("/chat/request")).json(&request);
        let body: ChatRequestResponse =
            send_json(Self::with_credential(builder, credential)).await?;
        if body.success {
            Ok(())
        } else {
            Err(DirectoryError::Rejected {
                message: body.message,
            })
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// MockDirectoryClient
///
/// In-memory directory. Listing returns the profiles tagged `Alumni`; search matches name or
/// email case-insensitively; chat requests are recorded, or rejected when `reject_chat` is set.
#[derive(Default)]
pub struct MockDirectoryClient {
    pub profiles: Vec<AlumniProfile>,
    /// When set, every chat request is rejected with this message.
    pub reject_chat: Option<Option<String>>,
    sent: Mutex<Vec<ChatRequestPayload>>,
}

impl MockDirectoryClient {
    pub fn new(profiles: Vec<AlumniProfile>) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    pub fn rejecting(profiles: Vec<AlumniProfile>, message: Option<String>) -> Self {
        Self {
            profiles,
            reject_chat: Some(message),
            ..Self::default()
        }
    }

    /// The chat requests accepted so far.
    pub fn sent_requests(&self) -> Vec<ChatRequestPayload> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DirectoryClient for MockDirectoryClient {
    async fn list_alumni(
        &self,
        _credential: Option<&str>,
    ) -> Result<Vec<AlumniProfile>, DirectoryError> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.roles.iter().any(|r| r.eq_ignore_ascii_case("alumni")))
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        _credential: Option<&str>,
        query: &str,
    ) -> Result<Vec<AlumniProfile>, DirectoryError> {
        let needle = query.to_lowercase();
        Ok(self
            .profiles
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn request_chat(
        &self,
        _credential: Option<&str>,
        request: ChatRequestPayload,
    ) -> Result<(), DirectoryError> {
        if let Some(message) = &self.reject_chat {
            return Err(DirectoryError::Rejected {
                message: message.clone(),
            });
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request);
        }
        Ok(())
    }
}

/// DirectoryState
///
/// The shared handle stored in the application state.
pub type DirectoryState = Arc<dyn DirectoryClient>;
