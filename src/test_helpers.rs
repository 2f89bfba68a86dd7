//! Shared test utilities for the booktex test suite.
//!
//! Provides fixture setup, small file writers, and builders for the
//! read-only inputs handlers take.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = fixture_config(tmp.path());
//!
//! let map = crossref_with(&[("s:intro", "Chapter 1")]);
//! let ctx = context(&map, tmp.path());
//! let out = CrossReference.post(&ctx, lines("==crossref==s:intro==\n")).unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tempfile::TempDir;

use crate::config::{self, BookConfig};
use crate::crossref::{CrossRefEntry, CrossRefMap};
use crate::handlers::Context;
use crate::locate::{BEGIN_MAIN, END_MAIN};
use crate::types::{Lines, split_lines};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/book/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/book");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture book's `_config.yml`.
pub fn fixture_config(root: &Path) -> BookConfig {
    config::load_config(&root.join("_config.yml")).unwrap()
}

// =========================================================================
// File writers
// =========================================================================

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Write `root/{slug}/index.html` with `body` as its main region and site
/// chrome around it.
pub fn write_page(root: &Path, slug: &str, body: &str) -> PathBuf {
    let html = format!(
        "<html>\n<nav><a href=\"../\">Home</a></nav>\n{BEGIN_MAIN}\n{body}{END_MAIN}\n<footer>site</footer>\n</html>\n"
    );
    write_file(root, &format!("{slug}/index.html"), &html)
}

// =========================================================================
// Handler inputs
// =========================================================================

/// Split text into a line buffer.
pub fn lines(text: &str) -> Lines {
    split_lines(text)
}

/// A cross-reference map from `(key, text)` pairs.
pub fn crossref_with(entries: &[(&str, &str)]) -> CrossRefMap {
    entries
        .iter()
        .map(|(key, text)| {
            (
                key.to_string(),
                CrossRefEntry {
                    slug: "test".into(),
                    toplevel: false,
                    text: text.to_string(),
                },
            )
        })
        .collect()
}

pub fn context<'a>(crossref: &'a CrossRefMap, include_dir: &'a Path) -> Context<'a> {
    Context {
        crossref,
        include_dir,
    }
}

// =========================================================================
// Converter stand-in
// =========================================================================

static PRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<pre[^>]*><code>").unwrap());
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h1[^>]*>(.*?)</h1>").unwrap());
static H2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h2[^>]*>(.*?)</h2>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Crude HTML→LaTeX conversion, just enough for the fixture book.
///
/// Turns code into `verbatim`, headings into `\section`/`\subsection`, and
/// strips every other tag. Text between tags, including placeholders, passes
/// through unchanged.
pub fn convert(html: &str) -> String {
    let text = PRE_RE.replace_all(html, "\n\\begin{verbatim}\n");
    let text = text.replace("</code></pre>", "\n\\end{verbatim}\n");
    let text = H1_RE.replace_all(&text, r"\section{$1}");
    let text = H2_RE.replace_all(&text, r"\subsection{$1}");
    TAG_RE.replace_all(&text, "").into_owned()
}
