use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Roles & Capabilities ---

/// Role
///
/// The closed set of capability tags a user can hold. Credentials carry roles as strings;
/// they are parsed into this enumeration once, at the edge, so a typo can never silently
/// grant or deny access further in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum Role {
    Student,
    Mentor,
    Admin,
    Alumni,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Mentor, Role::Admin, Role::Alumni];

    fn bit(self) -> u8 {
        match self {
            Role::Student => 1 << 0,
            Role::Mentor => 1 << 1,
            Role::Admin => 1 << 2,
            Role::Alumni => 1 << 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Mentor => "Mentor",
            Role::Admin => "Admin",
            Role::Alumni => "Alumni",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of the four known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// RoleSet
///
/// A set of roles stored as a bitset over `Role`. Used both for the roles a session holds
/// and for the roles a gated route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

/// The set of roles a route requires. A session satisfies it iff the two sets intersect.
pub type CapabilitySet = RoleSet;

impl RoleSet {
    pub const fn empty() -> Self {
        RoleSet(0)
    }

    pub fn all() -> Self {
        Role::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when at least one role is present in both sets. Empty sets never intersect.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| self.contains(*role))
    }

    pub fn to_vec(&self) -> Vec<Role> {
        self.iter().collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}

// --- Session ---

/// Session
///
/// The authenticated identity resolved from a credential. Immutable; a new value is built
/// whenever the authentication context changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub roles: RoleSet,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// SessionState
///
/// Loading and unauthenticated are distinct states: while loading, guarded views must
/// wait instead of redirecting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Unauthenticated,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

// --- Pages ---

/// PageId
///
/// Every page the route table can resolve to, including the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum PageId {
    Home,
    Login,
    Signup,
    ForgotPassword,
    ResetPassword,
    Unauthorized,
    StudentDashboard,
    Alumni,
    MentorDashboard,
    MentorTasks,
    MentorTeams,
    NotFound,
}

// --- API Output Schemas ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SessionStatus {
    Loading,
    Unauthenticated,
    Authenticated,
}

/// SessionView
///
/// Output schema for `GET /api/session`: the resolved session as the frontend sees it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionView {
    pub status: SessionStatus,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<Role>,
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Authenticated(session) => SessionView {
                status: SessionStatus::Authenticated,
                user_id: Some(session.user_id.clone()),
                name: Some(session.name.clone()),
                roles: session.roles.to_vec(),
                expires_at: Some(session.expires_at),
            },
            other => SessionView {
                status: if other.is_loading() {
                    SessionStatus::Loading
                } else {
                    SessionStatus::Unauthenticated
                },
                user_id: None,
                name: None,
                roles: vec![],
                expires_at: None,
            },
        }
    }
}

/// RouteManifestEntry
///
/// One row of `GET /api/routes`. `required_roles` is empty for public routes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteManifestEntry {
    pub pattern: String,
    pub page: PageId,
    pub public: bool,
    pub required_roles: Vec<Role>,
}

// --- Directory Schemas (external alumni backend) ---

/// AlumniProfile
///
/// A directory entry as returned by the external alumni backend. Roles stay as raw strings
/// here: they are display data, never used for access decisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AlumniProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role_title: Option<String>,
}

/// Envelope of `GET /auth/alumni`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlumniListResponse {
    pub success: bool,
    #[serde(default)]
    pub alumni: Vec<AlumniProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope of `GET /auth/search?query=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSearchResponse {
    pub success: bool,
    #[serde(default)]
    pub users: Vec<AlumniProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /chat/request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestPayload {
    pub receiver_id: String,
    pub topic: String,
}

/// Envelope of `POST /chat/request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequestResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// --- Portal API Schemas ---

/// AlumniSearchResult
///
/// Output schema for `GET /api/alumni`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct AlumniSearchResult {
    pub success: bool,
    pub users: Vec<AlumniProfile>,
}

/// ConnectRequest
///
/// Input payload for `POST /api/connect`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ConnectRequest {
    pub receiver_id: String,
    pub receiver_name: String,
}

/// ConnectResponse
///
/// Output schema for `POST /api/connect`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ConnectResponse {
    pub success: bool,
    pub message: String,
}

/// ConnectionNotice
///
/// The realtime `send_request` event: tells the receiver someone wants to connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConnectionNotice {
    pub receiver_id: String,
    pub sender_name: String,
}
