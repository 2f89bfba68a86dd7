//! Table-of-contents resolution.
//!
//! Stage 1 of the book build. Numbers every lesson as a chapter and every
//! extra as a lettered appendix, then numbers the anchored level-2 headings
//! inside each page's Markdown source. The result is an [`Outline`] (kept in
//! reading order for display) which flattens into the [`CrossRefMap`] that the
//! transform stage resolves references against.
//!
//! ## Numbering
//!
//! ```text
//! toc.lessons = [intro, tools]      toc.extras = [glossary]
//!
//! s:intro          Chapter 1
//!   s:intro-why      Section 1.1
//!   s:intro-how      Section 1.2
//! s:tools          Chapter 2
//! s:glossary       Appendix A
//!   s:glossary-use   Section A.1
//! ```
//!
//! ## Heading Syntax
//!
//! Only level-2 headings ending in an inline anchor of the form `{#s:ident}`
//! are numbered:
//!
//! ```markdown
//! ## Why Bother? {#s:intro-why}     numbered
//! ## Why Bother?                    ignored (no anchor)
//! ### Details {#s:intro-details}    ignored (not level 2)
//! ```

use crate::config::TocConfig;
use crate::crossref::{CrossRefEntry, CrossRefError, CrossRefMap};
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TocError {
    #[error("Cannot read source {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0} extras listed but only 26 appendix letters exist")]
    TooManyExtras(usize),
    #[error(transparent)]
    CrossRef(#[from] CrossRefError),
}

/// Level-2 heading carrying a `{#s:...}` anchor.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##[ \t]+.+[ \t]+\{#(s:[^}\s]+)\}").expect("valid regex")
});

const APPENDIX_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Where a page sits in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// 1-based chapter number.
    Chapter(usize),
    /// Appendix letter.
    Appendix(char),
}

impl Label {
    /// Prefix used for section numbers inside this page (`"3"` or `"B"`).
    pub fn base(&self) -> String {
        match self {
            Label::Chapter(n) => n.to_string(),
            Label::Appendix(c) => c.to_string(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Chapter(n) => write!(f, "Chapter {n}"),
            Label::Appendix(c) => write!(f, "Appendix {c}"),
        }
    }
}

/// An anchored heading inside a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    /// Display text, e.g. `"Section 2.4"`.
    pub text: String,
}

/// One chapter or appendix with its numbered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub slug: String,
    pub label: Label,
    pub sections: Vec<Section>,
}

impl OutlineEntry {
    /// Key of the page's own anchor: `s:{slug}`.
    pub fn key(&self) -> String {
        format!("s:{}", self.slug)
    }
}

/// The resolved table of contents in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Flatten into the anchor lookup table, rejecting duplicate keys.
    pub fn to_crossref(&self) -> Result<CrossRefMap, CrossRefError> {
        let mut map = CrossRefMap::new();
        for entry in &self.entries {
            map.insert(
                entry.key(),
                CrossRefEntry {
                    slug: entry.slug.clone(),
                    toplevel: true,
                    text: entry.label.to_string(),
                },
            )?;
            for section in &entry.sections {
                map.insert(
                    section.key.clone(),
                    CrossRefEntry {
                        slug: entry.slug.clone(),
                        toplevel: false,
                        text: section.text.clone(),
                    },
                )?;
            }
        }
        Ok(map)
    }
}

/// Number the anchored headings in one page's Markdown, in document order.
pub fn number_sections(markdown: &str, label: Label) -> Vec<Section> {
    let base = label.base();
    HEADING_RE
        .captures_iter(markdown)
        .enumerate()
        .map(|(i, caps)| Section {
            key: caps[1].to_string(),
            text: format!("Section {}.{}", base, i + 1),
        })
        .collect()
}

/// Resolve the outline, reading `{source_dir}/{slug}.md` for every slug.
pub fn resolve(toc: &TocConfig, source_dir: &Path) -> Result<Outline, TocError> {
    if toc.extras.len() > APPENDIX_LETTERS.len() {
        return Err(TocError::TooManyExtras(toc.extras.len()));
    }

    let chapters = toc
        .lessons
        .iter()
        .enumerate()
        .map(|(i, slug)| (slug, Label::Chapter(i + 1)));
    let appendices = toc
        .extras
        .iter()
        .zip(APPENDIX_LETTERS.iter())
        .map(|(slug, &letter)| (slug, Label::Appendix(letter as char)));

    let mut entries = Vec::with_capacity(toc.lessons.len() + toc.extras.len());
    for (slug, label) in chapters.chain(appendices) {
        let path = source_dir.join(format!("{slug}.md"));
        let markdown = fs::read_to_string(&path).map_err(|source| TocError::Source {
            path: path.clone(),
            source,
        })?;
        let sections = number_sections(&markdown, label);
        debug!(%slug, %label, sections = sections.len(), "resolved");
        entries.push(OutlineEntry {
            slug: slug.clone(),
            label,
            sections,
        });
    }

    Ok(Outline { entries })
}

/// Resolve the outline and flatten it into the cross-reference map.
pub fn build(toc: &TocConfig, source_dir: &Path) -> Result<CrossRefMap, TocError> {
    Ok(resolve(toc, source_dir)?.to_crossref()?)
}
