//! Session handling for the request pipeline.
//!
//! # Components
//!
//! - [`public`]: allowlist of paths that never carry forced credentials
//! - [`augment`]: attaches stored credentials to outgoing requests
//! - [`sync`]: persists tokens the backend rotates through response headers
//! - [`classify`]: decides what a failed response means for the session
//! - [`cooldown`]: suppresses refresh attempts after a refresh failure

pub mod augment;
pub mod classify;
pub mod cooldown;
pub mod public;
pub mod sync;

use reqwest::header::HeaderName;

pub use augment::augment_headers;
pub use classify::{FailureContext, FailureKind, classify};
pub use cooldown::{DEFAULT_REFRESH_COOLDOWN, RefreshCooldown};
pub use public::{DEFAULT_PUBLIC_ENDPOINTS, PublicEndpoints};
pub use sync::{rotated_tokens, sync_tokens};

/// Endpoint that exchanges a refresh token for new credentials.
pub const REFRESH_PATH: &str = "/auth/refresh-token";

/// Login endpoint. Outages reported here raise a user-facing alert.
pub const LOGIN_PATH: &str = "/auth/login";

/// Duplicate of the bearer credential for backends that read a custom header.
pub const ACCESS_TOKEN_HEADER: HeaderName = HeaderName::from_static("access-token");

/// Carries the refresh token on the refresh call, and rotated refresh tokens
/// on responses.
pub const REFRESH_TOKEN_HEADER: HeaderName = HeaderName::from_static("refresh-token");

/// Whether `path` targets the refresh endpoint.
pub fn is_refresh_path(path: &str) -> bool {
    path.contains(REFRESH_PATH)
}

/// Whether `path` targets the login endpoint.
pub fn is_login_path(path: &str) -> bool {
    path.contains(LOGIN_PATH)
}

/// Notifications the client raises for the hosting application.
///
/// The transport layer never navigates or prompts on its own; hosts subscribe
/// with [`FolioClient::subscribe`](crate::FolioClient::subscribe) and decide
/// what to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session could not be renewed and its tokens were purged. The host
    /// should send the user to `login_route`.
    SessionExpired { login_route: String },

    /// A login attempt hit a backend outage. The host should alert the user.
    ServiceUnavailable { message: String },
}
