//! Cross-references to chapters and sections.
//!
//! Authors write `<a href="#REF">s:intro-why</a>`: the link text *is* the
//! anchor key. On the web a script rewrites these into real links; in the book
//! they become `Section 1.1~\ref{s:intro-why}`, with the display text taken
//! from the cross-reference map.
//!
//! A key missing from the map is an error. Emitting a `\ref` with no text
//! would produce a book that builds but reads "see ~??".

use super::{Context, Handler, HandlerError, decode, encode};
use crate::placeholder::Kind;
use crate::types::Lines;
use regex::Regex;
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"<a\s+href="#REF">([^<]+)</a>"##).expect("valid regex"));

pub struct CrossReference;

impl Handler for CrossReference {
    fn name(&self) -> &'static str {
        "crossref"
    }

    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        encode(lines, &LINK_RE, Kind::CrossRef, false)
    }

    fn post(&self, ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        decode(lines, Kind::CrossRef, Kind::CrossRef.pattern(), |token| {
            let key = token.value();
            let entry = ctx
                .crossref
                .get(key)
                .ok_or_else(|| HandlerError::MissingCrossRef(key.to_string()))?;
            Ok(format!("{}~\\ref{{{}}}", entry.text, key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossref::CrossRefMap;
    use crate::test_helpers::*;
    use std::path::Path;

    #[test]
    fn link_becomes_placeholder() {
        let map = CrossRefMap::new();
        let out = CrossReference
            .pre(
                &context(&map, Path::new(".")),
                lines("see <a href=\"#REF\">s:intro</a> for more\n"),
            )
            .unwrap();
        assert_eq!(out, lines("see ==crossref==s:intro== for more\n"));
    }

    #[test]
    fn ordinary_links_untouched() {
        let map = CrossRefMap::new();
        let input = lines("<a href=\"https://example.com\">s:intro</a>\n");
        let out = CrossReference
            .pre(&context(&map, Path::new(".")), input.clone())
            .unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn placeholder_resolves_to_text_and_ref() {
        let map = crossref_with(&[("s:intro", "Section 1.1")]);
        let out = CrossReference
            .post(&context(&map, Path::new(".")), lines("==crossref==s:intro==\n"))
            .unwrap();
        assert_eq!(out, lines("Section 1.1~\\ref{s:intro}\n"));
    }

    #[test]
    fn several_references_on_one_line() {
        let map = crossref_with(&[("s:a", "Chapter 1"), ("s:b", "Appendix B")]);
        let out = CrossReference
            .post(
                &context(&map, Path::new(".")),
                lines("(==crossref==s:a==, ==crossref==s:b==)\n"),
            )
            .unwrap();
        assert_eq!(out, lines("(Chapter 1~\\ref{s:a}, Appendix B~\\ref{s:b})\n"));
    }

    #[test]
    fn missing_key_is_fatal() {
        let map = CrossRefMap::new();
        let err = CrossReference
            .post(&context(&map, Path::new(".")), lines("==crossref==s:intro==\n"))
            .unwrap_err();
        assert!(matches!(err, HandlerError::MissingCrossRef(key) if key == "s:intro"));
    }

    #[test]
    fn pre_then_post_round_trip() {
        let map = crossref_with(&[("s:intro", "Section 1.1")]);
        let ctx = context(&map, Path::new("."));
        let staged = CrossReference
            .pre(&ctx, lines("<a href=\"#REF\">s:intro</a>\n"))
            .unwrap();
        assert_eq!(staged, lines("==crossref==s:intro==\n"));
        let out = CrossReference.post(&ctx, staged).unwrap();
        assert_eq!(out, lines("Section 1.1~\\ref{s:intro}\n"));
    }
}
