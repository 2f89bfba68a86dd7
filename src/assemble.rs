//! Concatenation of every page into one document.
//!
//! ```text
//! ==frontmatter==
//! {source_dir}/index.html     main region
//! ==mainmatter==
//! {source_dir}/{lesson}/index.html ...
//! ==midpoint==
//! {source_dir}/{extra}/index.html ...
//! ```
//!
//! The markers are bare tokens with no parts. They pass through every
//! placeholder handler untouched and are only turned into LaTeX by the
//! structural substitutions at the end of the post phase.

use crate::config::TocConfig;
use crate::locate::{self, LocateError};
use crate::types::Lines;
use std::path::Path;
use tracing::debug;

/// A structural break inserted between groups of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    FrontMatter,
    MainMatter,
    /// Between the last lesson and the first extra.
    Midpoint,
}

impl Marker {
    pub const fn token(self) -> &'static str {
        match self {
            Marker::FrontMatter => "==frontmatter==",
            Marker::MainMatter => "==mainmatter==",
            Marker::Midpoint => "==midpoint==",
        }
    }

    fn line(self) -> String {
        format!("{}\n", self.token())
    }
}

/// One located page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub slug: String,
    pub lines: Lines,
}

/// Every page's main region, grouped the way the book is laid out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    /// Main region of the site's home page.
    pub front: Lines,
    pub lessons: Vec<Page>,
    pub extras: Vec<Page>,
}

impl Book {
    /// Locate the home page and every page the table of contents names.
    pub fn load(source_dir: &Path, toc: &TocConfig) -> Result<Self, LocateError> {
        let front = locate::extract(&source_dir.join("index.html"))?;
        let lessons = load_pages(source_dir, &toc.lessons)?;
        let extras = load_pages(source_dir, &toc.extras)?;
        debug!(
            front = front.len(),
            lessons = lessons.len(),
            extras = extras.len(),
            "loaded book"
        );
        Ok(Self {
            front,
            lessons,
            extras,
        })
    }

    /// Total lines across every page, excluding markers.
    pub fn line_count(&self) -> usize {
        self.front.len()
            + self
                .lessons
                .iter()
                .chain(&self.extras)
                .map(|page| page.lines.len())
                .sum::<usize>()
    }

    /// Flatten into a single line buffer with the structural markers in place.
    pub fn into_lines(self) -> Lines {
        let mut lines = Vec::with_capacity(self.line_count() + 3);
        lines.push(Marker::FrontMatter.line());
        lines.extend(self.front);
        lines.push(Marker::MainMatter.line());
        lines.extend(self.lessons.into_iter().flat_map(|page| page.lines));
        lines.push(Marker::Midpoint.line());
        lines.extend(self.extras.into_iter().flat_map(|page| page.lines));
        lines
    }
}

fn load_pages(source_dir: &Path, slugs: &[String]) -> Result<Vec<Page>, LocateError> {
    let regions = locate::locate(source_dir, slugs)?;
    Ok(slugs
        .iter()
        .cloned()
        .zip(regions)
        .map(|(slug, lines)| Page { slug, lines })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn page(slug: &str, body: &str) -> Page {
        Page {
            slug: slug.into(),
            lines: lines(body),
        }
    }

    #[test]
    fn markers_at_fixed_points() {
        let book = Book {
            front: lines("home\n"),
            lessons: vec![page("a", "a1\na2\n"), page("b", "b1\n")],
            extras: vec![page("x", "x1\n")],
        };
        assert_eq!(
            book.into_lines().concat(),
            "==frontmatter==\nhome\n==mainmatter==\na1\na2\nb1\n==midpoint==\nx1\n"
        );
    }

    #[test]
    fn empty_toc_still_has_every_marker() {
        let book = Book {
            front: lines("home\n"),
            ..Book::default()
        };
        assert_eq!(
            book.into_lines(),
            lines("==frontmatter==\nhome\n==mainmatter==\n==midpoint==\n")
        );
    }

    #[test]
    fn line_count_excludes_markers() {
        let book = Book {
            front: lines("h\n"),
            lessons: vec![page("a", "1\n2\n")],
            extras: vec![page("x", "3\n")],
        };
        assert_eq!(book.line_count(), 4);
        assert_eq!(book.into_lines().len(), 7);
    }

    #[test]
    fn load_fixture_book_in_toc_order() {
        let tmp = setup_fixtures();
        let config = fixture_config(tmp.path());
        let book = Book::load(tmp.path(), &config.toc).unwrap();

        let lessons: Vec<&str> = book.lessons.iter().map(|p| p.slug.as_str()).collect();
        let extras: Vec<&str> = book.extras.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(lessons, vec!["intro", "tools"]);
        assert_eq!(extras, vec!["glossary"]);
        assert!(book.front[0].contains(locate::BEGIN_MAIN));
    }

    #[test]
    fn load_fails_on_missing_home_page() {
        let tmp = TempDir::new().unwrap();
        write_page(tmp.path(), "a", "<p>A</p>\n");
        let toc = TocConfig {
            lessons: vec!["a".into()],
            extras: vec![],
        };
        let err = Book::load(tmp.path(), &toc).unwrap_err();
        assert!(matches!(err, LocateError::Read { path, .. } if path.ends_with("index.html")));
    }

    #[test]
    fn load_fails_on_missing_chapter_page() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "index.html",
            "<!-- begin: main -->\nhome\n<!-- end: main -->\n",
        );
        let toc = TocConfig {
            lessons: vec!["gone".into()],
            extras: vec![],
        };
        assert!(Book::load(tmp.path(), &toc).is_err());
    }
}
