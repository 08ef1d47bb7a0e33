//! Rotated token persistence.

use reqwest::header::{HeaderMap, HeaderName};

use super::{ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER};
use crate::store::{Credentials, TokenKind, TokenStore};

/// Persist tokens the backend rotated through response headers.
///
/// Each non-empty `access-token` / `refresh-token` header overwrites its
/// store entry. Applying the same headers twice leaves the same state. Store
/// failures are logged and never fail the response.
///
/// Returns the tokens that were found.
pub fn sync_tokens(headers: &HeaderMap, store: &dyn TokenStore) -> Credentials {
    let rotated = rotated_tokens(headers);

    for kind in [TokenKind::Access, TokenKind::Refresh] {
        if let Some(value) = rotated.get(kind) {
            match store.set(kind, value) {
                Ok(()) => tracing::debug!(token = %kind, "stored rotated token"),
                Err(e) => tracing::warn!(token = %kind, error = %e, "failed to store rotated token"),
            }
        }
    }

    rotated
}

/// Tokens carried by `access-token` / `refresh-token` response headers,
/// without touching any store.
pub fn rotated_tokens(headers: &HeaderMap) -> Credentials {
    Credentials {
        access_token: header_token(headers, &ACCESS_TOKEN_HEADER),
        refresh_token: header_token(headers, &REFRESH_TOKEN_HEADER),
    }
}

fn header_token(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_rotated_tokens_overwrite_store() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("old-a", "old-r"));
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("access-token"),
            HeaderValue::from_static("new-a"),
        );

        let rotated = sync_tokens(&headers, &store);

        assert_eq!(rotated.access_token.as_deref(), Some("new-a"));
        assert_eq!(rotated.refresh_token, None);
        assert_eq!(store.credentials(), Credentials::new("new-a", "old-r"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let store = MemoryTokenStore::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(b"Refresh-Token").unwrap(),
            HeaderValue::from_static("R9"),
        );

        sync_tokens(&headers, &store);
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("R9"));
    }

    #[test]
    fn test_applying_twice_is_idempotent() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("a", "r"));
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_static("a2"));
        headers.insert(REFRESH_TOKEN_HEADER, HeaderValue::from_static("r2"));

        sync_tokens(&headers, &store);
        let once = store.credentials();
        sync_tokens(&headers, &store);
        assert_eq!(store.credentials(), once);
        assert_eq!(once, Credentials::new("a2", "r2"));
    }

    #[test]
    fn test_empty_header_ignored() {
        let store = MemoryTokenStore::with_credentials(Credentials::new("a", "r"));
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_static(""));

        let rotated = sync_tokens(&headers, &store);
        assert!(rotated.is_empty());
        assert_eq!(store.credentials(), Credentials::new("a", "r"));
    }
}
