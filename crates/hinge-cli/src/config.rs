//! `hinge` configuration file.
//!
//! ```json
//! { "seed": 42, "lexer": { "block_start": "<%", "block_end": "%>" } }
//! ```

use std::path::{Path, PathBuf};

use hinge_lexer::LexerConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub lexer: LexerConfig,
    /// Seed for `random` output; entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Lexer {
        path: PathBuf,
        #[source]
        source: hinge_lexer::ConfigError,
    },
}

impl Config {
    /// Load the config at `path`, or the defaults when no path is given.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        config.lexer.validate().map_err(|source| ConfigError::Lexer {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), seed = ?config.seed, "loaded config");
        Ok(config)
    }
}
