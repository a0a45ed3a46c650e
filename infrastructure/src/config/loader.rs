//! Configuration loading via figment.
//!
//! Merge order (later wins): defaults, the TOML file, then
//! `CONCLAVE_*`-prefixed environment variables with `__` as the nesting
//! separator (e.g. `CONCLAVE_FAMILIES__DEEPSEEK__API_KEY`).

use super::FileConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

/// Loads [`FileConfig`] from disk and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default config file location: `~/.config/conclave/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("conclave").join("config.toml"))
    }

    /// Load configuration, merging file and environment.
    ///
    /// A missing file is not an error; the defaults simply stand.
    pub fn load(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(FileConfig::default()));

        let file = path.map(Path::to_path_buf).or_else(Self::default_path);
        if let Some(file) = file {
            debug!(path = %file.display(), "merging config file");
            figment = figment.merge(Toml::file(file));
        }

        let config = figment
            .merge(Env::prefixed("CONCLAVE_").split("__"))
            .extract()?;
        Ok(config)
    }
}
