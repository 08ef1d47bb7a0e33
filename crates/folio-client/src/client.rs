//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use url::Url;

use crate::api::{AuthApi, HealthApi, JournalsApi};
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::session::{PublicEndpoints, RefreshCooldown, SessionEvent};
use crate::store::{MemoryTokenStore, SharedTokenStore};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default route of the host application's login page.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Session events buffered per subscriber before the oldest are dropped.
const SESSION_EVENT_CAPACITY: usize = 16;

/// Folio API client.
///
/// Every call goes through the session pipeline: stored credentials are
/// attached, rotated tokens are persisted, and a request that fails with an
/// expired access token is replayed once after a session refresh.
///
/// # Example
///
/// ```no_run
/// use folio_client::FolioClient;
///
/// # async fn example() -> folio_client::Result<()> {
/// let client = FolioClient::builder()
///     .base_url("http://localhost:5000/api")
///     .build()?;
///
/// client.auth().login("ada@example.org", "secret").await?;
/// let mine = client.journals().my_journals().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FolioClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Session tokens.
    pub(crate) store: SharedTokenStore,
    /// Paths that never carry forced credentials or refresh.
    pub(crate) public: PublicEndpoints,
    /// Refresh breaker.
    pub(crate) cooldown: Arc<RefreshCooldown>,
    /// Host route of the login page.
    pub(crate) login_route: String,
    /// Host route currently displayed.
    pub(crate) current_route: RwLock<Option<String>>,
    /// Session event fan-out.
    pub(crate) events: broadcast::Sender<SessionEvent>,
}

impl FolioClient {
    /// Get access to the inner client state (for API implementations).
    pub(crate) fn inner(&self) -> &ClientInner {
        &self.inner
    }
}

impl FolioClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Token store backing this client.
    pub fn token_store(&self) -> &SharedTokenStore {
        &self.inner.store
    }

    /// Refresh breaker shared by all clones of this client.
    pub fn cooldown(&self) -> &Arc<RefreshCooldown> {
        &self.inner.cooldown
    }

    /// Public endpoint allowlist.
    pub fn public_endpoints(&self) -> &PublicEndpoints {
        &self.inner.public
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host route tracking
    // ─────────────────────────────────────────────────────────────────────────

    /// Route of the host's login page.
    pub fn login_route(&self) -> &str {
        &self.inner.login_route
    }

    /// Tell the client which route the host application is showing.
    pub fn set_current_route(&self, route: impl Into<String>) {
        *self.inner.current_route.write() = Some(route.into());
    }

    /// Route the host application is showing, if it reported one.
    pub fn current_route(&self) -> Option<String> {
        self.inner.current_route.read().clone()
    }

    /// Whether the host is on its login page: the login route itself, or it
    /// followed by a query, fragment or sub-path.
    pub fn is_on_login_route(&self) -> bool {
        self.inner
            .current_route
            .read()
            .as_deref()
            .is_some_and(|route| is_within_route(route, &self.inner.login_route))
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        if self.inner.events.send(event).is_err() {
            tracing::debug!("no session event subscribers");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the journals API.
    pub fn journals(&self) -> JournalsApi {
        JournalsApi::new(self.clone())
    }

    /// Access the health API.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // JSON helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(RequestDescriptor::get(path)).await?.json()
    }

    /// Make a POST request.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(RequestDescriptor::post(path).json(body)?)
            .await?
            .json()
    }

    /// Make a PUT request.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(RequestDescriptor::put(path).json(body)?)
            .await?
            .json()
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(RequestDescriptor::delete(path)).await?;
        Ok(())
    }
}

fn is_within_route(route: &str, base: &str) -> bool {
    route
        .strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['?', '#', '/']))
}

/// Builder for creating a FolioClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    store: Option<SharedTokenStore>,
    public: PublicEndpoints,
    cooldown: Option<Arc<RefreshCooldown>>,
    login_route: String,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            store: None,
            public: PublicEndpoints::default(),
            cooldown: None,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }

    /// Set the API base URL (e.g. `https://folio.example.org/api`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Use a specific token store. Defaults to an in-memory store.
    pub fn token_store(mut self, store: SharedTokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Add paths to the public endpoint allowlist.
    pub fn public_endpoints<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for fragment in fragments {
            self.public.add(fragment);
        }
        self
    }

    /// Inject a refresh breaker, e.g. to observe it from tests.
    pub fn cooldown(mut self, cooldown: Arc<RefreshCooldown>) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// Use a fresh refresh breaker with the given window.
    pub fn cooldown_window(mut self, window: Duration) -> Self {
        self.cooldown = Some(Arc::new(RefreshCooldown::new(window)));
        self
    }

    /// Set the host route of the login page.
    pub fn login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<FolioClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        if !self.login_route.starts_with('/') {
            return Err(Error::Config(format!(
                "login route must start with '/': {}",
                self.login_route
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("folio-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);

        Ok(FolioClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                store: self
                    .store
                    .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
                public: self.public,
                cooldown: self.cooldown.unwrap_or_default(),
                login_route: self.login_route,
                current_route: RwLock::new(None),
                events,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:5000/api")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:5000/api/");
    }

    #[test]
    fn test_builder_rejects_relative_login_route() {
        let result = ClientBuilder::new()
            .base_url("http://localhost:5000")
            .login_route("login")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:5000/api")
            .build()
            .unwrap();

        let url = client.url("/journals/my-journals").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/journals/my-journals");

        let url = client.url("journals/public?page=2").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/journals/public?page=2");
    }

    #[test]
    fn test_login_route_tracking() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:5000")
            .build()
            .unwrap();

        assert!(!client.is_on_login_route());
        client.set_current_route("/login?next=/dashboard");
        assert!(client.is_on_login_route());
        client.set_current_route("/login/reset");
        assert!(client.is_on_login_route());
        client.set_current_route("/login-help");
        assert!(!client.is_on_login_route());
        client.set_current_route("/loginx");
        assert!(!client.is_on_login_route());
        client.set_current_route("/dashboard");
        assert!(!client.is_on_login_route());
        assert_eq!(client.current_route().as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_public_endpoints_extend_defaults() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:5000")
            .public_endpoints(["/announcements"])
            .build()
            .unwrap();

        assert!(client.public_endpoints().is_public("/announcements"));
        assert!(client.public_endpoints().is_public("/auth/login"));
    }
}
