//! Failure classification.

use reqwest::StatusCode;

use super::{PublicEndpoints, RefreshCooldown, is_refresh_path};
use crate::error::ErrorResponse;
use crate::request::Attempt;

/// What a failed response means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Backend outage (503 + `service_unavailable`). Never retried.
    ServiceUnavailable,
    /// The request targeted a public path. Surfaced as-is.
    PublicEndpoint,
    /// Expired or invalid access token on a request that may still refresh.
    AuthExpired,
    /// Anything else. Surfaced as-is.
    Other,
}

/// Client state the classifier consults.
#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub public: &'a PublicEndpoints,
    pub cooldown: &'a RefreshCooldown,
    /// The hosting application is currently showing its login route.
    pub on_login_route: bool,
}

/// Classify a failed response. Checks run in declaration order of
/// [`FailureKind`]; only [`FailureKind::AuthExpired`] leads to a refresh.
pub fn classify(
    status: StatusCode,
    body: &[u8],
    attempt: &Attempt,
    ctx: &FailureContext<'_>,
) -> FailureKind {
    if status == StatusCode::SERVICE_UNAVAILABLE
        && serde_json::from_slice::<ErrorResponse>(body)
            .is_ok_and(|e| e.is_service_unavailable())
    {
        return FailureKind::ServiceUnavailable;
    }

    let path = &attempt.descriptor.path;
    if ctx.public.is_public(path) {
        return FailureKind::PublicEndpoint;
    }

    if status != StatusCode::UNAUTHORIZED
        || attempt.is_retry()
        || is_refresh_path(path)
        || ctx.on_login_route
    {
        return FailureKind::Other;
    }

    if ctx.cooldown.is_failed() {
        tracing::debug!(%path, "refresh suppressed by cool-down");
        return FailureKind::Other;
    }

    FailureKind::AuthExpired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestDescriptor;

    const OUTAGE: &[u8] = br#"{"error":"service_unavailable","message":"db down"}"#;

    fn attempt(path: &str) -> Attempt {
        Attempt::first(RequestDescriptor::get(path))
    }

    fn run(status: StatusCode, body: &[u8], attempt: &Attempt) -> FailureKind {
        classify(
            status,
            body,
            attempt,
            &FailureContext {
                public: &PublicEndpoints::new(),
                cooldown: &RefreshCooldown::default(),
                on_login_route: false,
            },
        )
    }

    #[test]
    fn test_outage_on_login() {
        assert_eq!(
            run(StatusCode::SERVICE_UNAVAILABLE, OUTAGE, &attempt("/auth/login")),
            FailureKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_503_without_discriminator_is_other() {
        assert_eq!(
            run(
                StatusCode::SERVICE_UNAVAILABLE,
                b"{}",
                &attempt("/journals/my-journals")
            ),
            FailureKind::Other
        );
    }

    #[test]
    fn test_public_401_never_refreshes() {
        assert_eq!(
            run(StatusCode::UNAUTHORIZED, b"", &attempt("/journals/public?page=1")),
            FailureKind::PublicEndpoint
        );
    }

    #[test]
    fn test_private_401_is_auth_expired() {
        assert_eq!(
            run(StatusCode::UNAUTHORIZED, b"", &attempt("/journals/my-journals")),
            FailureKind::AuthExpired
        );
    }

    #[test]
    fn test_retried_401_is_other() {
        let retry = attempt("/journals/my-journals").into_retry();
        assert_eq!(
            run(StatusCode::UNAUTHORIZED, b"", &retry),
            FailureKind::Other
        );
    }

    #[test]
    fn test_refresh_endpoint_401_is_other() {
        assert_eq!(
            run(StatusCode::UNAUTHORIZED, b"", &attempt("/auth/refresh-token")),
            FailureKind::Other
        );
    }

    #[test]
    fn test_cooldown_suppresses_refresh() {
        let cooldown = RefreshCooldown::default();
        cooldown.mark_failed();
        let kind = classify(
            StatusCode::UNAUTHORIZED,
            b"",
            &attempt("/journals/my-journals"),
            &FailureContext {
                public: &PublicEndpoints::new(),
                cooldown: &cooldown,
                on_login_route: false,
            },
        );
        assert_eq!(kind, FailureKind::Other);
    }

    #[test]
    fn test_login_route_suppresses_refresh() {
        let kind = classify(
            StatusCode::UNAUTHORIZED,
            b"",
            &attempt("/journals/my-journals"),
            &FailureContext {
                public: &PublicEndpoints::new(),
                cooldown: &RefreshCooldown::default(),
                on_login_route: true,
            },
        );
        assert_eq!(kind, FailureKind::Other);
    }

    #[test]
    fn test_forbidden_is_other() {
        assert_eq!(
            run(StatusCode::FORBIDDEN, b"", &attempt("/journals/my-journals")),
            FailureKind::Other
        );
    }
}
