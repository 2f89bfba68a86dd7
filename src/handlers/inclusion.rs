//! Replacement regions: HTML content swapped for a hand-written LaTeX file.
//!
//! Some content renders well on the web but needs a bespoke LaTeX version
//! (wide tables, diagrams drawn in TikZ). Authors wrap the web version in a
//! div naming the replacement:
//!
//! ```html
//! <div markdown="1" replacement="big-table.tex">
//! | ... web-only table ... |
//! </div>
//! ```
//!
//! Pre drops the whole region, leaving a single `==include==big-table.tex==`
//! line. Post swaps that line for the file's contents, read from the include
//! directory.

use super::{Context, Handler, HandlerError};
use crate::placeholder::{Kind, Placeholder, PlaceholderError};
use crate::types::{Lines, split_lines};
use regex::Regex;
use std::fs;
use std::sync::LazyLock;

static START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div\b[^>]*\breplacement="([^"]+)"[^>]*>"#).expect("valid regex")
});

const END_TAG: &str = "</div>";

/// Whether the pre step is copying lines or swallowing a region.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Echo {
    Copying,
    /// Inside the region for the named file.
    Suppressing(String),
}

pub struct Inclusion;

impl Handler for Inclusion {
    fn name(&self) -> &'static str {
        "inclusion"
    }

    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        let mut state = Echo::Copying;
        let mut result = Vec::with_capacity(lines.len());
        for line in lines {
            if matches!(state, Echo::Suppressing(_)) {
                if line.contains(END_TAG) {
                    state = Echo::Copying;
                }
                continue;
            }
            let found = START_RE.captures(&line).map(|caps| {
                let end = caps.get(0).map_or(0, |m| m.end());
                (end, Placeholder::from_captures(Kind::Include, &caps))
            });
            let Some((end, token)) = found else {
                result.push(line);
                continue;
            };
            let token = token?;
            result.push(format!("{token}\n"));
            // A region opened and closed on one line swallows nothing else
            if !line[end..].contains(END_TAG) {
                state = Echo::Suppressing(token.value().to_string());
            }
        }
        match state {
            Echo::Copying => Ok(result),
            Echo::Suppressing(file) => Err(HandlerError::UnclosedInclusion(file)),
        }
    }

    fn post(&self, ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        let mut result = Vec::with_capacity(lines.len());
        for line in lines {
            let found = Kind::Include
                .pattern()
                .captures(&line)
                .map(|caps| Placeholder::from_captures(Kind::Include, &caps));
            let Some(token) = found else {
                if line.contains(&Kind::Include.opener()) {
                    return Err(PlaceholderError::Malformed {
                        kind: Kind::Include,
                        text: line.trim_end().to_string(),
                    }
                    .into());
                }
                result.push(line);
                continue;
            };
            let token = token?;
            let path = ctx.include_dir.join(token.value());
            let mut content = fs::read_to_string(&path)
                .map_err(|source| HandlerError::Include { path, source })?;
            // The file replaces a whole line, terminator included
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            result.extend(split_lines(&content));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossref::CrossRefMap;
    use crate::test_helpers::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn pre(input: &str) -> Result<Lines, HandlerError> {
        let map = CrossRefMap::new();
        Inclusion.pre(&context(&map, Path::new(".")), lines(input))
    }

    #[test]
    fn region_collapses_to_placeholder() {
        let out = pre("before\n<div replacement=\"foo.tex\">\n<p>web</p>\n</div>\nafter\n").unwrap();
        assert_eq!(out, lines("before\n==include==foo.tex==\nafter\n"));
    }

    #[test]
    fn other_attributes_allowed_on_start_tag() {
        let out = pre("<div markdown=\"1\" replacement=\"t.tex\" class=\"x\">\nbody\n</div>\n").unwrap();
        assert_eq!(out, lines("==include==t.tex==\n"));
    }

    #[test]
    fn ordinary_divs_pass_through() {
        let input = "<div class=\"note\">\ntext\n</div>\n";
        assert_eq!(pre(input).unwrap(), lines(input));
    }

    #[test]
    fn first_end_tag_closes_region() {
        let out = pre("<div replacement=\"a.tex\">\nx\n</div>\n</div>\n").unwrap();
        assert_eq!(out, lines("==include==a.tex==\n</div>\n"));
    }

    #[test]
    fn single_line_region_suppresses_nothing_else() {
        let out = pre("<div replacement=\"a.tex\">web</div>\nkept\n").unwrap();
        assert_eq!(out, lines("==include==a.tex==\nkept\n"));
    }

    #[test]
    fn consecutive_regions() {
        let out = pre(concat!(
            "<div replacement=\"a.tex\">\n1\n</div>\n",
            "mid\n",
            "<div replacement=\"b.tex\">\n2\n</div>\n",
        ))
        .unwrap();
        assert_eq!(out, lines("==include==a.tex==\nmid\n==include==b.tex==\n"));
    }

    #[test]
    fn unclosed_region_is_error() {
        let err = pre("<div replacement=\"a.tex\">\nnever closed\n").unwrap_err();
        assert!(matches!(err, HandlerError::UnclosedInclusion(f) if f == "a.tex"));
    }

    #[test]
    fn file_name_with_delimiter_is_rejected() {
        let err = pre("<div replacement=\"a=b.tex\">\n</div>\n").unwrap_err();
        assert!(matches!(err, HandlerError::Placeholder(_)));
    }

    // =========================================================================
    // post
    // =========================================================================

    #[test]
    fn placeholder_replaced_by_file_contents() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "foo.tex", "Hello\n");
        let map = CrossRefMap::new();

        let out = Inclusion
            .post(&context(&map, tmp.path()), lines("a\n==include==foo.tex==\nb\n"))
            .unwrap();
        assert_eq!(out, lines("a\nHello\nb\n"));
    }

    #[test]
    fn multi_line_file_expands_line_count() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "t.tex", "\\begin{tabular}{ll}\na & b\n\\end{tabular}\n");
        let map = CrossRefMap::new();

        let out = Inclusion
            .post(&context(&map, tmp.path()), lines("==include==t.tex==\n"))
            .unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], "a & b\n");
    }

    #[test]
    fn file_without_final_newline_keeps_next_line_separate() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "foo.tex", "Hello");
        let map = CrossRefMap::new();

        let out = Inclusion
            .post(
                &context(&map, tmp.path()),
                lines("==include==foo.tex==\n\\section{Next}\n"),
            )
            .unwrap();
        assert_eq!(out, lines("Hello\n\\section{Next}\n"));
    }

    #[test]
    fn leftover_include_opener_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let map = CrossRefMap::new();
        let ctx = context(&map, tmp.path());

        for input in ["==include==a.tex\n", "before\n==include====\nafter\n"] {
            let err = Inclusion.post(&ctx, lines(input)).unwrap_err();
            assert!(matches!(
                err,
                HandlerError::Placeholder(PlaceholderError::Malformed {
                    kind: Kind::Include,
                    ..
                })
            ));
        }
    }

    #[test]
    fn missing_include_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let map = CrossRefMap::new();

        let err = Inclusion
            .post(&context(&map, tmp.path()), lines("==include==gone.tex==\n"))
            .unwrap_err();
        assert!(matches!(err, HandlerError::Include { path, .. } if path.ends_with("gone.tex")));
    }

    #[test]
    fn pre_then_post_inlines_file() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "foo.tex", "Hello\n");
        let map = CrossRefMap::new();
        let ctx = context(&map, tmp.path());

        let staged = Inclusion
            .pre(&ctx, lines("<div replacement=\"foo.tex\">\nweb only\n</div>\n"))
            .unwrap();
        assert_eq!(staged, lines("==include==foo.tex==\n"));
        assert_eq!(Inclusion.post(&ctx, staged).unwrap(), lines("Hello\n"));
    }
}
