//! Inline markup that round-trips through a placeholder unchanged.
//!
//! | Handler | HTML | LaTeX |
//! |---------|------|-------|
//! | [`GlossaryEntry`] | `<strong id="g:key">term</strong>` | `\hypertarget{g:key}{term}\label{g:key}` |
//! | [`Figure`] | `<figure id="f:key"> <img src="p"> <figcaption>c</figcaption> </figure>` | `figure` environment |
//! | [`Citation`] | `<a href="#BIB">k1,k2</a>` | `\cite{k1,k2}` |
//! | [`Command`] | `<!-- == noindent -->` | `\noindent` |
//!
//! Glossary and figure tokens are wrapped in `<strong>` so the converter
//! treats them as inline text rather than dropping them as unknown HTML.

use super::{Context, Handler, HandlerError, decode, encode};
use crate::placeholder::Kind;
use crate::types::Lines;
use regex::Regex;
use std::sync::LazyLock;

static GLOSSARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<strong id="(g:[^"]+)">([^<]+)</strong>"#).expect("valid regex")
});

static FIGURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<figure +id="(f:[^"]+)"> *<img +src="([^"]+)"> *<figcaption>(.+?)</figcaption> *</figure>"#,
    )
    .expect("valid regex")
});

static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"<a href="#BIB">([^<]+)</a>"##).expect("valid regex"));

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- +== +([A-Za-z]+) +-->").expect("valid regex"));

/// A command token at the end of its line also swallows the newline, so the
/// command runs into the paragraph that follows it.
static COMMAND_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==command==([^=]+)==\n?").expect("valid regex"));

pub struct GlossaryEntry;

impl Handler for GlossaryEntry {
    fn name(&self) -> &'static str {
        "glossary"
    }

    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        encode(lines, &GLOSSARY_RE, Kind::Glossary, true)
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        decode(lines, Kind::Glossary, Kind::Glossary.pattern(), |token| {
            let [key, term] = token.parts() else {
                unreachable!("glossary arity is checked on decode")
            };
            Ok(format!("\\hypertarget{{{key}}}{{{term}}}\\label{{{key}}}"))
        })
    }
}

pub struct Figure;

impl Handler for Figure {
    fn name(&self) -> &'static str {
        "figure"
    }

    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        encode(lines, &FIGURE_RE, Kind::Figure, true)
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        decode(lines, Kind::Figure, Kind::Figure.pattern(), |token| {
            let [key, image, caption] = token.parts() else {
                unreachable!("figure arity is checked on decode")
            };
            Ok(format!(
                "\\begin{{figure}}[H]\\label{{{key}}}\\centering\\includegraphics{{{image}}}\\caption{{{caption}}}\\end{{figure}}"
            ))
        })
    }
}

pub struct Citation;

impl Handler for Citation {
    fn name(&self) -> &'static str {
        "citation"
    }

    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        encode(lines, &CITATION_RE, Kind::Citation, false)
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        decode(lines, Kind::Citation, Kind::Citation.pattern(), |token| {
            Ok(format!("\\cite{{{}}}", token.value()))
        })
    }
}

/// A LaTeX command requested from Markdown through an HTML comment.
pub struct Command;

impl Handler for Command {
    fn name(&self) -> &'static str {
        "command"
    }

    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        encode(lines, &COMMAND_RE, Kind::Command, false)
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        decode(lines, Kind::Command, &COMMAND_TOKEN_RE, |token| {
            Ok(format!("\\{}", token.value()))
        })
    }
}
