//! The cross-reference map: anchor key → where it lives and how to cite it.
//!
//! Built once by the [`toc`](crate::toc) resolver and handed to the transform
//! stage as a JSON file, in the same way each stage of the build hands its
//! output to the next. Keys are anchor identifiers with a kind prefix
//! (`s:` for chapters and sections); values record the owning slug, whether
//! the anchor is a chapter/appendix, and the text a reference renders as.
//!
//! ```json
//! {
//!   "s:intro": { "slug": "intro", "toplevel": true, "text": "Chapter 1" },
//!   "s:intro-why": { "slug": "intro", "toplevel": false, "text": "Section 1.1" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrossRefError {
    #[error("Cannot read cross-reference map {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate anchor '{key}' in '{first}' and '{second}'")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
}

/// One resolvable anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossRefEntry {
    /// Slug of the page that owns the anchor.
    pub slug: String,
    /// True for chapter and appendix anchors, false for sections.
    pub toplevel: bool,
    /// Display text, e.g. `"Chapter 2"` or `"Section A.3"`.
    pub text: String,
}

/// Anchor key → entry. Keys are unique across the whole book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossRefMap(BTreeMap<String, CrossRefEntry>);

impl CrossRefMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor, refusing to shadow one that already exists.
    pub fn insert(&mut self, key: String, entry: CrossRefEntry) -> Result<(), CrossRefError> {
        if let Some(existing) = self.0.get(&key) {
            return Err(CrossRefError::DuplicateKey {
                key,
                first: existing.slug.clone(),
                second: entry.slug,
            });
        }
        self.0.insert(key, entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CrossRefEntry> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrossRefEntry)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize as pretty-printed JSON with sorted keys.
    pub fn to_json(&self) -> Result<String, CrossRefError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CrossRefError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a map previously written by `booktex toc`.
    pub fn load(path: &Path) -> Result<Self, CrossRefError> {
        let json = fs::read_to_string(path).map_err(|source| CrossRefError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

impl FromIterator<(String, CrossRefEntry)> for CrossRefMap {
    /// Collect without duplicate checking; later entries win.
    fn from_iter<I: IntoIterator<Item = (String, CrossRefEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
