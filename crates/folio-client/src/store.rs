//! Token storage.
//!
//! Holds the session's `accessToken` and `refreshToken`. The store API is
//! synchronous: every read and write completes before the caller continues,
//! so the request pipeline can consult it between awaits without holding a
//! lock across a suspension point.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which of the two session tokens an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived credential sent with API calls.
    Access,
    /// Longer-lived credential used only to mint a new access token.
    Refresh,
}

impl TokenKind {
    /// Storage key for this token.
    pub fn key(self) -> &'static str {
        match self {
            TokenKind::Access => "accessToken",
            TokenKind::Refresh => "refreshToken",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The pair of session tokens.
///
/// Serializes with the storage keys (`accessToken`, `refreshToken`), which is
/// also the shape the backend uses in auth response bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Both tokens present.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// Token of the given kind, if present.
    pub fn get(&self, kind: TokenKind) -> Option<&str> {
        match kind {
            TokenKind::Access => self.access_token.as_deref(),
            TokenKind::Refresh => self.refresh_token.as_deref(),
        }
    }

    fn slot(&mut self, kind: TokenKind) -> &mut Option<String> {
        match kind {
            TokenKind::Access => &mut self.access_token,
            TokenKind::Refresh => &mut self.refresh_token,
        }
    }

    /// True when neither token is present.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

// ============================================================================
// TokenStore Trait
// ============================================================================

/// Persistent key/value storage for the session tokens.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Read a token.
    fn get(&self, kind: TokenKind) -> Option<String>;

    /// Overwrite a token.
    fn set(&self, kind: TokenKind, value: &str) -> Result<()>;

    /// Delete a token. Deleting a missing token is not an error.
    fn remove(&self, kind: TokenKind) -> Result<()>;

    /// Snapshot of both tokens.
    fn credentials(&self) -> Credentials {
        Credentials {
            access_token: self.get(TokenKind::Access),
            refresh_token: self.get(TokenKind::Refresh),
        }
    }

    /// Write every token present in `credentials`, leaving the others untouched.
    fn store_credentials(&self, credentials: &Credentials) -> Result<()> {
        for kind in [TokenKind::Access, TokenKind::Refresh] {
            if let Some(value) = credentials.get(kind) {
                self.set(kind, value)?;
            }
        }
        Ok(())
    }

    /// Delete both tokens.
    fn clear(&self) -> Result<()> {
        self.remove(TokenKind::Access)?;
        self.remove(TokenKind::Refresh)
    }
}

/// Token store shared between clones of a client.
pub type SharedTokenStore = Arc<dyn TokenStore>;

// ============================================================================
// MemoryTokenStore
// ============================================================================

/// In-process token store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Credentials>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            tokens: RwLock::new(credentials),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens.read().get(kind).map(str::to_string)
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        *self.tokens.write().slot(kind) = Some(value.to_string());
        Ok(())
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        *self.tokens.write().slot(kind) = None;
        Ok(())
    }
}

// ============================================================================
// FileTokenStore
// ============================================================================

/// Token store backed by a JSON file.
///
/// The file holds a single object keyed by `accessToken`/`refreshToken`. It is
/// rewritten on every mutation and removed once both tokens are gone.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Credentials>,
}

impl FileTokenStore {
    /// Open a store at `path`, loading existing tokens if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cached = if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::TokenStore(format!("failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                Error::TokenStore(format!("failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Credentials::default()
        };

        Ok(Self {
            path,
            cached: RwLock::new(cached),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, credentials: &Credentials) -> Result<()> {
        if credentials.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).map_err(|e| {
                    Error::TokenStore(format!("failed to delete {}: {}", self.path.display(), e))
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::TokenStore(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(credentials)?;
        std::fs::write(&self.path, json).map_err(|e| {
            Error::TokenStore(format!("failed to write {}: {}", self.path.display(), e))
        })
    }

    fn update(&self, kind: TokenKind, value: Option<String>) -> Result<()> {
        let mut cached = self.cached.write();
        if *cached.slot(kind) == value {
            return Ok(());
        }
        *cached.slot(kind) = value;
        self.persist(&cached)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.cached.read().get(kind).map(str::to_string)
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.update(kind, Some(value.to_string()))
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        self.update(kind, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_token_keys() {
        assert_eq!(TokenKind::Access.key(), "accessToken");
        assert_eq!(TokenKind::Refresh.key(), "refreshToken");
    }

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryTokenStore::new();
        assert!(store.credentials().is_empty());

        store.set(TokenKind::Access, "a1").unwrap();
        store.set(TokenKind::Refresh, "r1").unwrap();
        assert_eq!(store.credentials(), Credentials::new("a1", "r1"));

        store.set(TokenKind::Access, "a2").unwrap();
        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("a2"));

        store.remove(TokenKind::Access).unwrap();
        assert_eq!(store.get(TokenKind::Access), None);
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("r1"));
    }

    #[test]
    fn test_store_credentials_keeps_missing_entries() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("a1", "r1"));
        store
            .store_credentials(&Credentials {
                access_token: Some("a2".to_string()),
                refresh_token: None,
            })
            .unwrap();
        assert_eq!(store.credentials(), Credentials::new("a2", "r1"));
    }

    #[test]
    fn test_clear_removes_both() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("a", "r"));
        store.clear().unwrap();
        assert!(store.credentials().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");

        let store = FileTokenStore::open(&path).unwrap();
        store
            .store_credentials(&Credentials::new("access", "refresh"))
            .unwrap();
        assert!(path.is_file());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"accessToken\""));
        assert!(raw.contains("\"refreshToken\""));

        let reopened = FileTokenStore::open(&path).unwrap();
        assert_eq!(reopened.credentials(), Credentials::new("access", "refresh"));
    }

    #[test]
    fn test_file_store_clear_deletes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let store = FileTokenStore::open(&path).unwrap();
        store.set(TokenKind::Access, "a").unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
        assert!(store.credentials().is_empty());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileTokenStore::open(&path).unwrap_err();
        assert!(matches!(err, Error::TokenStore(_)));
    }
}
