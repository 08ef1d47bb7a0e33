//! Auth API.

use crate::client::FolioClient;
use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::session::{REFRESH_PATH, rotated_tokens};
use crate::store::{Credentials, TokenKind};
use crate::types::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, User};

/// Auth API client.
pub struct AuthApi {
    client: FolioClient,
}

impl AuthApi {
    pub(crate) fn new(client: FolioClient) -> Self {
        Self { client }
    }

    /// Log in. Tokens from the response headers are stored by the pipeline;
    /// tokens in the body are stored here.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse> {
        let request = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let response: AuthResponse = self.client.post("/auth/login", &request).await?;
        self.store_body_tokens(&response)?;
        Ok(response)
    }

    /// Create an account. Behaves like [`login`](Self::login) for tokens.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self.client.post("/auth/register", &request).await?;
        self.store_body_tokens(&response)?;
        Ok(response)
    }

    /// Explicitly renew the session.
    ///
    /// Returns `Ok(None)` when there is nothing to use: no stored refresh
    /// token, a `204 No Content` reply, or a reply that carried no tokens.
    /// The cool-down is only cleared when new tokens arrive.
    pub async fn refresh(&self) -> Result<Option<Credentials>> {
        let store = self.client.token_store();
        let Some(refresh_token) = store.get(TokenKind::Refresh) else {
            return Ok(None);
        };

        let descriptor =
            RequestDescriptor::post(REFRESH_PATH).json(&RefreshTokenRequest { refresh_token })?;
        let response = self.client.send(descriptor).await?;
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            tracing::debug!("refresh returned no content");
            return Ok(None);
        }

        // Header tokens were already persisted by the pipeline
        let mut rotated = rotated_tokens(response.headers());
        if let Ok(body) = response.json::<AuthResponse>()
            && !body.tokens.is_empty()
        {
            store.store_credentials(&body.tokens)?;
            rotated = Credentials {
                access_token: body.tokens.access_token.or(rotated.access_token),
                refresh_token: body.tokens.refresh_token.or(rotated.refresh_token),
            };
        }

        if rotated.is_empty() {
            tracing::debug!("refresh returned no tokens");
            return Ok(None);
        }

        self.client.cooldown().reset();
        Ok(Some(store.credentials()))
    }

    /// Log out. The server call is best-effort; local tokens are always
    /// cleared.
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.client.send(RequestDescriptor::post("/auth/logout")).await {
            tracing::debug!(error = %e, "server logout failed");
        }
        self.client.token_store().clear()
    }

    /// Current user.
    pub async fn me(&self) -> Result<User> {
        self.client.get("/auth/me").await
    }

    fn store_body_tokens(&self, response: &AuthResponse) -> Result<()> {
        if response.tokens.is_empty() {
            return Ok(());
        }
        self.client.token_store().store_credentials(&response.tokens)
    }
}
