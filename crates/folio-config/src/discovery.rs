//! Locating and stacking folio config files.
//!
//! Layers, lowest precedence first:
//! 1. `config.toml` in the folio config dir (`FOLIO_CONFIG_DIR`, else the
//!    platform config dir joined with `folio`)
//! 2. the nearest `folio.toml` in the working directory or any ancestor
//!
//! A relative `session.token_file` is resolved against the directory of the
//! file that sets it, so a project can keep its tokens next to its
//! `folio.toml` regardless of where the CLI is run from.

use std::path::{Path, PathBuf};

use crate::{ConfigError, FolioConfig, Result};

/// Project config file, searched upwards from the working directory.
const PROJECT_CONFIG_FILE: &str = "folio.toml";

/// User config file inside the config dir.
const USER_CONFIG_FILE: &str = "config.toml";

/// Overrides the config dir (tokens and logs live there too).
const CONFIG_DIR_ENV: &str = "FOLIO_CONFIG_DIR";

/// Where a layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// `config.toml` in the config dir.
    User,
    /// Nearest `folio.toml`.
    Project,
    /// A file named on the command line; replaces discovery entirely.
    Explicit,
}

/// A config file that contributed to the effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub kind: LayerKind,
    pub path: PathBuf,
}

/// Effective configuration plus how it was assembled.
#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub config: FolioConfig,
    /// Files that were applied, lowest precedence first.
    pub layers: Vec<Layer>,
    /// Files that exist but could not be used.
    pub warnings: Vec<String>,
}

impl ResolvedConfig {
    /// Path of the applied layer of the given kind.
    pub fn layer(&self, kind: LayerKind) -> Option<&Path> {
        self.layers
            .iter()
            .find(|l| l.kind == kind)
            .map(|l| l.path.as_path())
    }

    fn stack(&mut self, kind: LayerKind, path: &Path) {
        if !path.is_file() {
            return;
        }

        match read_layer(path) {
            Ok(layer) => {
                self.config.merge(layer);
                self.layers.push(Layer {
                    kind,
                    path: path.to_path_buf(),
                });
            }
            Err(e) => self
                .warnings
                .push(format!("ignoring {}: {}", path.display(), e)),
        }
    }
}

/// Discover config layers for a CLI run from `working_dir`.
pub fn discover(working_dir: &Path) -> ResolvedConfig {
    discover_in(working_dir, config_dir().as_deref())
}

/// Like [`discover`], with the config dir given explicitly.
pub fn discover_in(working_dir: &Path, config_dir: Option<&Path>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    if let Some(dir) = config_dir {
        resolved.stack(LayerKind::User, &dir.join(USER_CONFIG_FILE));
    }
    if let Some(path) = find_project_file(working_dir) {
        resolved.stack(LayerKind::Project, &path);
    }

    resolved
}

/// Use exactly one file. Unlike discovery, a missing or malformed file is an
/// error.
pub fn load_file(path: &Path) -> Result<ResolvedConfig> {
    Ok(ResolvedConfig {
        config: read_layer(path)?,
        layers: vec![Layer {
            kind: LayerKind::Explicit,
            path: path.to_path_buf(),
        }],
        warnings: Vec::new(),
    })
}

/// Folio's config dir: `FOLIO_CONFIG_DIR`, else `<platform config dir>/folio`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join("folio"))
}

fn read_layer(path: &Path) -> Result<FolioConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut config = FolioConfig::from_toml(&text)?;

    if let Some(file) = config.session.token_file.as_ref()
        && file.is_relative()
        && !file.starts_with("~")
        && let Some(base) = path.parent()
    {
        let anchored = base.join(file);
        config.session.token_file = Some(anchored);
    }

    Ok(config)
}

fn find_project_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}
