//! Session-aware HTTP client for the Folio journal platform API.
//!
//! The backend issues short-lived access tokens and longer-lived refresh
//! tokens. This crate keeps them in a [`TokenStore`], attaches them to every
//! non-public request, persists tokens the backend rotates through response
//! headers, and renews the session once when a request fails with an expired
//! access token.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use folio_client::{FileTokenStore, FolioClient, Result, SessionEvent};
//!
//! # async fn example() -> Result<()> {
//! let client = FolioClient::builder()
//!     .base_url("http://localhost:5000/api")
//!     .token_store(Arc::new(FileTokenStore::open("tokens.json")?))
//!     .build()?;
//!
//! // React to session loss instead of navigating from the transport layer
//! let mut events = client.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         if let SessionEvent::SessionExpired { login_route } = event {
//!             println!("please log in again ({})", login_route);
//!         }
//!     }
//! });
//!
//! client.auth().login("ada@example.org", "secret").await?;
//! for journal in client.journals().my_journals().await?.journals {
//!     println!("{}: {}", journal.id, journal.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Session rules
//!
//! - Paths in the [`PublicEndpoints`] allowlist never get forced credentials
//!   and never trigger a refresh.
//! - A 401 on any other request triggers at most one refresh and one replay.
//! - A failed refresh purges the tokens, trips the [`RefreshCooldown`] and
//!   emits [`SessionEvent::SessionExpired`]; the caller gets the original
//!   error.

pub mod api;
pub mod client;
pub mod error;
mod pipeline;
pub mod request;
pub mod session;
pub mod store;
pub mod types;

pub use client::{ClientBuilder, DEFAULT_LOGIN_ROUTE, FolioClient};
pub use error::{Error, Result};
pub use request::{ApiResponse, Attempt, RequestDescriptor};
pub use session::{FailureKind, PublicEndpoints, RefreshCooldown, SessionEvent};
pub use store::{
    Credentials, FileTokenStore, MemoryTokenStore, SharedTokenStore, TokenKind, TokenStore,
};
pub use types::*;

pub use api::ListJournalsQuery;
