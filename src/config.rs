//! Book configuration module.
//!
//! Handles loading and validating the file that lists the book's table of
//! contents. The lesson sites this tool works on keep that listing in their
//! Jekyll `_config.yml`, so the loader accepts the site's own config file and
//! ignores every key it does not understand.
//!
//! ## Configuration Shape
//!
//! ```yaml
//! title: "Software Design by Example"   # ignored
//! toc:
//!   lessons:          # numbered chapters, in order
//!     - intro
//!     - tools
//!   extras:           # lettered appendices, in order
//!     - glossary
//!     - bib
//! ```
//!
//! The same shape works as TOML:
//!
//! ```toml
//! [toc]
//! lessons = ["intro", "tools"]
//! extras = ["glossary", "bib"]
//! ```
//!
//! ## Format Selection
//!
//! A file ending in `.toml` is parsed as TOML. Anything else is parsed as YAML,
//! which also covers JSON.
//!
//! ## Validation
//!
//! - Every slug must be non-empty and must not contain a path separator, since
//!   slugs double as file and directory names.
//! - No slug may appear twice, across lessons and extras combined.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The book configuration: only the table of contents matters here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub toc: TocConfig,
}

/// Ordered chapter and appendix slugs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TocConfig {
    /// Numbered chapters, in reading order.
    pub lessons: Vec<String>,
    /// Lettered appendices, in reading order.
    pub extras: Vec<String>,
}

impl TocConfig {
    /// Every slug in reading order: lessons first, then extras.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.lessons.iter().chain(&self.extras).map(String::as_str)
    }
}

impl BookConfig {
    /// Check slugs are usable as path segments and unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for slug in self.toc.slugs() {
            if slug.is_empty() {
                return Err(ConfigError::Validation("toc slugs must not be empty".into()));
            }
            if slug.contains('/') || slug.contains('\\') {
                return Err(ConfigError::Validation(format!(
                    "toc slug '{slug}' must not contain a path separator"
                )));
            }
            if !seen.insert(slug) {
                return Err(ConfigError::Validation(format!(
                    "toc slug '{slug}' is listed more than once"
                )));
            }
        }
        Ok(())
    }
}

/// Parse config text, picking the format from the file name.
pub fn parse_config(path: &Path, content: &str) -> Result<BookConfig, ConfigError> {
    let is_toml = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);
    let config: BookConfig = if is_toml {
        toml::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };
    config.validate()?;
    Ok(config)
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<BookConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &content)
}
