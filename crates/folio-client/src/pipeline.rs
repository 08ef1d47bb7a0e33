//! Request pipeline and refresh coordinator.
//!
//! ```text
//! send ─▶ augment ─▶ network ─▶ sync tokens ─▶ 2xx ─────────────▶ Ok
//!                                   │
//!                                   └─ failure ─▶ classify
//!                                        ├─ AuthExpired ─▶ refresh ─▶ replay once
//!                                        │                    └─ failed ─▶ end session, original error
//!                                        └─ otherwise ───────────────────▶ Err
//! ```
//!
//! Concurrent requests that fail together each run their own refresh; there
//! is no in-flight de-duplication. The cool-down breaker is the only thing
//! limiting parallel refresh calls.

use reqwest::header::HeaderMap;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::FolioClient;
use crate::error::{Error, Result};
use crate::request::{ApiResponse, Attempt, RequestDescriptor};
use crate::session::{
    FailureContext, FailureKind, REFRESH_PATH, SessionEvent, augment_headers, classify,
    is_login_path, sync_tokens,
};
use crate::store::TokenKind;
use crate::types::RefreshTokenRequest;

impl FolioClient {
    /// Send a request through the session pipeline.
    ///
    /// Errors always reach the caller. The only automatic retry is a single
    /// replay after a successful session refresh.
    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
        let span = tracing::debug_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            method = %descriptor.method,
            path = %descriptor.path,
        );
        self.run(Attempt::first(descriptor)).instrument(span).await
    }

    async fn run(&self, mut attempt: Attempt) -> Result<ApiResponse> {
        loop {
            let response = self.dispatch(&attempt.descriptor).await?;
            if response.is_success() {
                return Ok(response);
            }

            match self.classify_failure(&response, &attempt) {
                FailureKind::AuthExpired => {
                    attempt = attempt.into_retry();
                    match self.refresh_session().await {
                        Ok(()) => {
                            tracing::info!("session refreshed, replaying request");
                        }
                        Err(reason) => {
                            self.end_session(&attempt.descriptor, &reason);
                            return Err(response.into_error());
                        }
                    }
                }
                FailureKind::ServiceUnavailable => {
                    let error = response.into_error();
                    if is_login_path(&attempt.descriptor.path) {
                        self.emit(SessionEvent::ServiceUnavailable {
                            message: service_message(&error),
                        });
                    }
                    tracing::warn!(error = %error, "backend unavailable");
                    return Err(error);
                }
                FailureKind::PublicEndpoint | FailureKind::Other => {
                    return Err(response.into_error());
                }
            }
        }
    }

    /// Send a descriptor once: attach credentials, perform the call, and
    /// persist any rotated tokens. No classification.
    pub(crate) async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<ApiResponse> {
        let inner = self.inner();
        let headers = augment_headers(descriptor, inner.store.as_ref(), &inner.public);
        let response = self.transmit(descriptor, headers).await?;

        sync_tokens(response.headers(), inner.store.as_ref());
        tracing::debug!(status = response.status().as_u16(), "response received");

        Ok(response)
    }

    /// Perform the HTTP call with exactly `headers`, no session handling.
    pub(crate) async fn transmit(
        &self,
        descriptor: &RequestDescriptor,
        headers: HeaderMap,
    ) -> Result<ApiResponse> {
        let inner = self.inner();
        let url = self.url(&descriptor.path)?;

        let mut request = inner
            .http
            .request(descriptor.method.clone(), url)
            .headers(headers)
            .timeout(inner.timeout);
        if !descriptor.query.is_empty() {
            request = request.query(&descriptor.query);
        }
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse::new(status, headers, body))
    }

    fn classify_failure(&self, response: &ApiResponse, attempt: &Attempt) -> FailureKind {
        let inner = self.inner();
        classify(
            response.status(),
            response.body(),
            attempt,
            &FailureContext {
                public: &inner.public,
                cooldown: &inner.cooldown,
                on_login_route: self.is_on_login_route(),
            },
        )
    }

    /// One call to the refresh endpoint. Rotated tokens are persisted by
    /// [`dispatch`](Self::dispatch) before this returns.
    async fn refresh_session(&self) -> Result<()> {
        let inner = self.inner();
        let refresh_token = inner
            .store
            .get(TokenKind::Refresh)
            .ok_or_else(|| Error::Auth("no refresh token stored".to_string()))?;

        let descriptor =
            RequestDescriptor::post(REFRESH_PATH).json(&RefreshTokenRequest { refresh_token })?;
        let response = self.dispatch(&descriptor).await?;
        if !response.is_success() {
            return Err(response.into_error());
        }

        inner.cooldown.reset();
        Ok(())
    }

    /// Tear the session down after a failed refresh.
    fn end_session(&self, original: &RequestDescriptor, reason: &Error) {
        let inner = self.inner();
        tracing::warn!(error = %reason, "session refresh failed, clearing credentials");

        inner.cooldown.mark_failed();
        if let Err(e) = inner.store.clear() {
            tracing::warn!(error = %e, "failed to clear token store");
        }

        if self.is_on_login_route() || original.is_static_asset() {
            return;
        }

        self.emit(SessionEvent::SessionExpired {
            login_route: inner.login_route.clone(),
        });
    }
}

fn service_message(error: &Error) -> String {
    match error {
        Error::ServiceUnavailable(message) => message.clone(),
        other => other.to_string(),
    }
}
