//! Composer configuration.
//!
//! Values come from the defaults, an optional TOML file and then the
//! `REPORT_COMPOSER_*` environment variables, in that order of precedence.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::clipboard::DEFAULT_FEEDBACK;
use crate::fonts::FONTS_DIR_ENV;
use crate::submit::DEFAULT_ENDPOINT;

/// Overrides the submission endpoint.
pub const ENDPOINT_ENV: &str = "REPORT_COMPOSER_ENDPOINT";
/// Overrides the PDF output directory.
pub const OUTPUT_DIR_ENV: &str = "REPORT_COMPOSER_OUTPUT_DIR";

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings shared by the CLI and the composer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// URL receiving submitted documents.
    pub endpoint: String,
    /// Directory where generated PDFs are written.
    pub output_dir: PathBuf,
    /// Directory searched for font files first.
    pub fonts_dir: Option<PathBuf>,
    /// Duration of the copy acknowledgment label, in milliseconds.
    pub copy_feedback_ms: u64,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            output_dir: PathBuf::from("."),
            fonts_dir: None,
            copy_feedback_ms: DEFAULT_FEEDBACK.as_millis() as u64,
        }
    }
}

impl ComposerConfig {
    /// Parses a TOML document.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path` when given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!("Loaded configuration from {}", path.display());
                Self::from_toml(&source, path)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    /// Applies overrides looked up through `lookup`; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = value(ENDPOINT_ENV) {
            self.endpoint = endpoint;
        }
        if let Some(output_dir) = value(OUTPUT_DIR_ENV) {
            self.output_dir = PathBuf::from(output_dir);
        }
        if let Some(fonts_dir) = value(FONTS_DIR_ENV) {
            self.fonts_dir = Some(PathBuf::from(fonts_dir));
        }
    }

    /// Copy acknowledgment duration.
    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}
