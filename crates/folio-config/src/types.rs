//! Configuration types.
//!
//! ```toml
//! [server]
//! base_url = "https://folio.example.org/api"
//! timeout_secs = 30
//!
//! [session]
//! login_route = "/login"
//! refresh_cooldown_secs = 30
//! token_file = "~/.config/folio/tokens.json"
//! public_endpoints = ["/announcements"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{ConfigError, Result};

/// Backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Request timeout used when nothing is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Refresh cool-down used when nothing is configured.
pub const DEFAULT_REFRESH_COOLDOWN_SECS: u64 = 30;

/// Login route used when nothing is configured.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Longest accepted request timeout.
pub const MAX_TIMEOUT_SECS: u64 = 60 * 60;

/// Longest accepted refresh cool-down.
pub const MAX_REFRESH_COOLDOWN_SECS: u64 = 24 * 60 * 60;

/// Token file name within the config directory.
pub const TOKEN_FILE: &str = "tokens.json";

// ─────────────────────────────────────────────────────────────────────────────
// Root
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Backend connection.
    pub server: ServerConfig,
    /// Session behavior.
    pub session: SessionConfig,
}

impl FolioConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: FolioConfig) {
        self.server.merge(other.server);
        self.session.merge(other.session);
    }

    /// Reject values the client cannot start with.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.server.base_url();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "server.base_url".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", base_url),
            });
        }

        if let Some(secs) = self.server.timeout_secs
            && !(1..=MAX_TIMEOUT_SECS).contains(&secs)
        {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_secs".to_string(),
                reason: format!("must be between 1 and {}", MAX_TIMEOUT_SECS),
            });
        }

        if let Some(secs) = self.session.refresh_cooldown_secs
            && secs > MAX_REFRESH_COOLDOWN_SECS
        {
            return Err(ConfigError::InvalidValue {
                field: "session.refresh_cooldown_secs".to_string(),
                reason: format!("must be at most {}", MAX_REFRESH_COOLDOWN_SECS),
            });
        }

        if !self.session.login_route().starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "session.login_route".to_string(),
                reason: "must start with '/'".to_string(),
            });
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// Backend connection settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// API base URL, including any path prefix such as `/api`.
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl ServerConfig {
    fn merge(&mut self, other: ServerConfig) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Effective base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Effective request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Session behavior.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Route of the login page in the host application.
    pub login_route: Option<String>,

    /// Seconds refresh attempts stay suppressed after a refresh failure.
    pub refresh_cooldown_secs: Option<u64>,

    /// Where tokens are persisted. `~/` is expanded.
    pub token_file: Option<PathBuf>,

    /// Path fragments added to the built-in public endpoint list.
    pub public_endpoints: Vec<String>,
}

impl SessionConfig {
    fn merge(&mut self, other: SessionConfig) {
        if other.login_route.is_some() {
            self.login_route = other.login_route;
        }
        if other.refresh_cooldown_secs.is_some() {
            self.refresh_cooldown_secs = other.refresh_cooldown_secs;
        }
        if other.token_file.is_some() {
            self.token_file = other.token_file;
        }
        for fragment in other.public_endpoints {
            if !self.public_endpoints.contains(&fragment) {
                self.public_endpoints.push(fragment);
            }
        }
    }

    /// Effective login route.
    pub fn login_route(&self) -> &str {
        self.login_route.as_deref().unwrap_or(DEFAULT_LOGIN_ROUTE)
    }

    /// Effective refresh cool-down.
    pub fn refresh_cooldown(&self) -> Duration {
        Duration::from_secs(
            self.refresh_cooldown_secs
                .unwrap_or(DEFAULT_REFRESH_COOLDOWN_SECS),
        )
    }

    /// Effective token file: the configured path, else `tokens.json` in the
    /// config directory.
    pub fn token_file(&self) -> Option<PathBuf> {
        match &self.token_file {
            Some(path) => Some(expand_path(path)),
            None => crate::config_dir().map(|d| d.join(TOKEN_FILE)),
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_path(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/"))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
