//! Main-region extraction from rendered HTML pages.
//!
//! Every page the site generator renders wraps its content between two
//! sentinel comments. Everything outside them (navigation, headers, footers,
//! scripts) is site chrome that has no place in the book.
//!
//! ```html
//! <nav>...</nav>
//! <!-- begin: main -->
//! <h1>Introduction</h1>
//! ...
//! <!-- end: main -->
//! <footer>...</footer>
//! ```
//!
//! The kept region includes both sentinel lines. A page without both
//! sentinels, in that order, is a structural error: there is no sensible way
//! to guess where its content starts.

use crate::types::{Lines, split_lines};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const BEGIN_MAIN: &str = "<!-- begin: main -->";
pub const END_MAIN: &str = "<!-- end: main -->";

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Cannot read page {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No begin-main marker in {}", .0.display())]
    MissingBegin(PathBuf),
    #[error("No end-main marker after the begin-main marker in {}", .0.display())]
    MissingEnd(PathBuf),
}

/// Which sentinel a region is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Begin,
    End,
}

/// Keep the lines from the first begin sentinel through the first end
/// sentinel after it, inclusive.
pub fn keep_main(lines: &[String]) -> Result<&[String], Missing> {
    let start = lines
        .iter()
        .position(|line| line.contains(BEGIN_MAIN))
        .ok_or(Missing::Begin)?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| line.contains(END_MAIN))
        .map(|offset| start + 1 + offset)
        .ok_or(Missing::End)?;
    Ok(&lines[start..=end])
}

/// Read a page and return its main region.
pub fn extract(path: &Path) -> Result<Lines, LocateError> {
    let content = fs::read_to_string(path).map_err(|source| LocateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let lines = split_lines(&content);
    let main = keep_main(&lines).map_err(|missing| match missing {
        Missing::Begin => LocateError::MissingBegin(path.to_path_buf()),
        Missing::End => LocateError::MissingEnd(path.to_path_buf()),
    })?;
    debug!(path = %path.display(), lines = main.len(), "located main region");
    Ok(main.to_vec())
}

/// Path of a slug's rendered page: `{source_dir}/{slug}/index.html`.
pub fn page_path(source_dir: &Path, slug: &str) -> PathBuf {
    source_dir.join(slug).join("index.html")
}

/// Extract the main region of every slug's page, in the order given.
pub fn locate<S: AsRef<str>>(source_dir: &Path, slugs: &[S]) -> Result<Vec<Lines>, LocateError> {
    slugs
        .iter()
        .map(|slug| extract(&page_path(source_dir, slug.as_ref())))
        .collect()
}
