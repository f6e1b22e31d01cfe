//! Configuration loading from TOML.
//!
//! Reads `config.toml` into strongly-typed structs. Every section has
//! defaults so the CLI runs without a config file; command-line flags
//! override whatever the file says.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::AnalysisOptions;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where game records come from when the CLI gets no file argument.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourceConfig {
    /// JSON file of games.
    #[serde(default)]
    pub games_file: Option<String>,
    /// URL serving a JSON document of games.
    #[serde(default)]
    pub games_url: Option<String>,
}

/// Default ordering of comparative output.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub descending: bool,
}

fn default_sort_by() -> String {
    "name".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sort_by: default_sort_by(),
            descending: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load the file if it exists, defaults otherwise. A file that
    /// exists but does not parse is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
