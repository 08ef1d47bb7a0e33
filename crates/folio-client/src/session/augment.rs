//! Outgoing credential attachment.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::{ACCESS_TOKEN_HEADER, PublicEndpoints, REFRESH_TOKEN_HEADER, is_refresh_path};
use crate::request::RequestDescriptor;
use crate::store::{TokenKind, TokenStore};

/// Headers to send for `descriptor`.
///
/// Public paths get the caller's headers untouched. Otherwise the stored
/// access token is attached as `Authorization: Bearer <t>` and `Access-Token:
/// <t>`, unless the caller already set `Authorization`. Calls to the refresh
/// endpoint also carry the stored refresh token in `Refresh-Token`.
pub fn augment_headers(
    descriptor: &RequestDescriptor,
    store: &dyn TokenStore,
    public: &PublicEndpoints,
) -> HeaderMap {
    let mut headers = descriptor.headers.clone();

    if public.is_public(&descriptor.path) {
        return headers;
    }

    if !descriptor.has_authorization()
        && let Some(token) = store.get(TokenKind::Access)
    {
        match (
            HeaderValue::from_str(&format!("Bearer {}", token)),
            HeaderValue::from_str(&token),
        ) {
            (Ok(bearer), Ok(raw)) => {
                headers.insert(AUTHORIZATION, bearer);
                headers.insert(ACCESS_TOKEN_HEADER, raw);
                tracing::trace!(path = %descriptor.path, "attached access token");
            }
            _ => tracing::warn!("stored access token is not a valid header value, skipping"),
        }
    }

    if is_refresh_path(&descriptor.path)
        && let Some(refresh) = store.get(TokenKind::Refresh)
    {
        match HeaderValue::from_str(&refresh) {
            Ok(value) => {
                headers.insert(REFRESH_TOKEN_HEADER, value);
            }
            Err(_) => tracing::warn!("stored refresh token is not a valid header value, skipping"),
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Credentials, MemoryTokenStore};

    fn store() -> MemoryTokenStore {
        MemoryTokenStore::with_credentials(Credentials::new("A1", "R1"))
    }

    #[test]
    fn test_private_request_gets_both_headers() {
        let headers = augment_headers(
            &RequestDescriptor::get("/journals/my-journals"),
            &store(),
            &PublicEndpoints::new(),
        );
        assert_eq!(headers[AUTHORIZATION], "Bearer A1");
        assert_eq!(headers[&ACCESS_TOKEN_HEADER], "A1");
        assert!(!headers.contains_key(&REFRESH_TOKEN_HEADER));
    }

    #[test]
    fn test_public_request_untouched() {
        let headers = augment_headers(
            &RequestDescriptor::get("/journals/public?page=1"),
            &store(),
            &PublicEndpoints::new(),
        );
        assert!(headers.is_empty());
    }

    #[test]
    fn test_explicit_authorization_wins() {
        let descriptor = RequestDescriptor::get("/journals/my-journals")
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer manual"));
        let headers = augment_headers(&descriptor, &store(), &PublicEndpoints::new());
        assert_eq!(headers[AUTHORIZATION], "Bearer manual");
        assert!(!headers.contains_key(&ACCESS_TOKEN_HEADER));
    }

    #[test]
    fn test_refresh_call_carries_refresh_token() {
        let headers = augment_headers(
            &RequestDescriptor::post("/auth/refresh-token"),
            &store(),
            &PublicEndpoints::new(),
        );
        assert_eq!(headers[&REFRESH_TOKEN_HEADER], "R1");
        assert_eq!(headers[AUTHORIZATION], "Bearer A1");
    }

    #[test]
    fn test_no_token_no_headers() {
        let headers = augment_headers(
            &RequestDescriptor::get("/journals/my-journals"),
            &MemoryTokenStore::new(),
            &PublicEndpoints::new(),
        );
        assert!(headers.is_empty());
    }

    #[test]
    fn test_invalid_token_is_skipped() {
        let store = MemoryTokenStore::with_credentials(Credentials {
            access_token: Some("bad\ntoken".to_string()),
            refresh_token: None,
        });
        let headers = augment_headers(
            &RequestDescriptor::get("/journals/my-journals"),
            &store,
            &PublicEndpoints::new(),
        );
        assert!(headers.is_empty());
    }
}
