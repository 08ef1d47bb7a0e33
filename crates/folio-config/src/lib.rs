//! Configuration system for the Folio client tools.
//!
//! Provides TOML-based configuration with:
//! - Server connection settings (`[server]`)
//! - Session behavior: login route, refresh cool-down, token file, extra
//!   public endpoints (`[session]`)
//! - Config file layering (user config dir + nearest project `folio.toml`)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    Layer, LayerKind, ResolvedConfig, config_dir, discover, discover_in, load_file,
};
pub use error::{ConfigError, Result};
pub use types::*;
