//! CLI command handlers.

pub mod auth;
pub mod journals;
pub mod request;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use console::Style;
use folio_client::{FileTokenStore, FolioClient, MemoryTokenStore, SessionEvent, SharedTokenStore};
use folio_config::FolioConfig;
use tokio::sync::broadcast;

/// Shared context for all commands.
pub struct Context {
    /// Client wired to the configured backend and token file.
    pub client: FolioClient,
    /// Effective configuration.
    pub config: FolioConfig,
    /// Where tokens are persisted, if anywhere.
    pub token_file: Option<PathBuf>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

/// Global flags that shape the [`Context`].
pub struct ContextOptions {
    pub server: Option<String>,
    pub config_file: Option<PathBuf>,
    pub json_output: bool,
    pub verbose: bool,
}

impl Context {
    /// Resolve configuration and build the client.
    pub fn load(options: ContextOptions) -> Result<Self> {
        let resolved = match &options.config_file {
            Some(path) => folio_config::load_file(path)?,
            None => folio_config::discover(&std::env::current_dir()?),
        };
        for warning in &resolved.warnings {
            tracing::warn!("{}", warning);
        }
        tracing::debug!(layers = ?resolved.layers, "configuration loaded");
        let mut config = resolved.config;

        if let Some(server) = options.server {
            config.server.base_url = Some(server);
        }
        config.validate()?;

        let token_file = config.session.token_file();
        let store: SharedTokenStore = match &token_file {
            Some(path) => Arc::new(
                FileTokenStore::open(path)
                    .with_context(|| format!("Failed to open token file {}", path.display()))?,
            ),
            None => {
                tracing::warn!("no config directory available, tokens will not persist");
                Arc::new(MemoryTokenStore::new())
            }
        };

        let client = FolioClient::builder()
            .base_url(config.server.base_url())
            .timeout(config.server.timeout())
            .token_store(store)
            .public_endpoints(config.session.public_endpoints.iter().cloned())
            .cooldown_window(config.session.refresh_cooldown())
            .login_route(config.session.login_route())
            .build()?;

        Ok(Self {
            client,
            config,
            token_file,
            json_output: options.json_output,
            verbose: options.verbose,
        })
    }
}

/// Print any session events raised while the command ran.
pub fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    let yellow = Style::new().yellow().bold();
    let red = Style::new().red().bold();

    loop {
        match events.try_recv() {
            Ok(SessionEvent::SessionExpired { .. }) => {
                eprintln!(
                    "{} your session has expired. Run 'folio auth login' to sign in again.",
                    yellow.apply_to("Session:")
                );
            }
            Ok(SessionEvent::ServiceUnavailable { message }) => {
                eprintln!("{} {}", red.apply_to("Service unavailable:"), message);
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "session events dropped");
            }
            Err(_) => break,
        }
    }
}

/// Show only the ends of a secret.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_long_secret() {
        assert_eq!(mask("abcdefghijkl"), "abcd...ijkl");
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask("abc"), "****");
    }
}
