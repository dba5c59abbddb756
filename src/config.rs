//! User defaults for new projects, read from `config.toml`.
//!
//! Looked up at `$PAX_CONFIG` first, then `<config dir>/pax/config.toml`.
//! A missing file is not an error; command-line flags always win.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ScaffoldError};
use crate::request::EnvTool;

pub const CONFIG_ENV: &str = "PAX_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub env: EnvTool,
    pub test: bool,
    pub version: String,
    pub description: String,
    pub license: String,
    pub authors: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: EnvTool::default(),
            test: true,
            version: "0.1.0".to_string(),
            description: "A project.".to_string(),
            license: "MIT".to_string(),
            authors: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| ScaffoldError::io(format!("failed to read {}", path.display()), e))?;
        let config = Self::parse(&raw).map_err(|e| {
            ScaffoldError::InvalidArgument(format!("invalid config {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("pax").join("config.toml")))
}
