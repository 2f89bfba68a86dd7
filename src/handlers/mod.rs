//! The handler chain: small, reversible markup translations.
//!
//! Each [`Handler`] owns one piece of markup and may act in either phase:
//!
//! - **pre** runs on the assembled HTML, before the external Markdown→LaTeX
//!   converter. Handlers that need data to survive the converter encode it as a
//!   [`Placeholder`](crate::placeholder::Placeholder).
//! - **post** runs on the converter's LaTeX output and turns those placeholders
//!   (or converter output that needs fixing) into the final LaTeX.
//!
//! Both default to passing lines through untouched. A handler may change the
//! number of lines, so no handler relies on line positions.
//!
//! # Chain Order
//!
//! [`chain`] returns the handlers in the fixed order both phases use. The order
//! is load-bearing:
//!
//! | Constraint | Why |
//! |------------|-----|
//! | `section` → `subsection` → `subsubsection` | each heading level is demoted exactly once |
//! | `section` before `bibliography-title` | the title match expects the renamed `\chapter` |
//! | `code-block` squash before its own match | the language marker must sit next to `\begin{verbatim}` |
//! | `inclusion` | independent of every other handler |
//!
//! The structural markers written by the assembler (`==frontmatter==`, ...)
//! are only resolved near the end, after every placeholder kind is gone.

mod code;
mod inclusion;
mod markup;
mod reference;
mod substitution;

pub use code::CodeBlock;
pub use inclusion::Inclusion;
pub use markup::{Citation, Command, Figure, GlossaryEntry};
pub use reference::CrossReference;
pub use substitution::{SpecialCharacters, Substitution, SvgFigures};

use crate::crossref::CrossRefMap;
use crate::placeholder::{self, Kind, Placeholder, PlaceholderError};
use crate::types::Lines;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Placeholder(#[from] PlaceholderError),
    #[error("Cross-reference '{0}' is not in the cross-reference map")]
    MissingCrossRef(String),
    #[error("Cannot read include file {}: {source}", .path.display())]
    Include {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Replacement region for '{0}' is never closed")]
    UnclosedInclusion(String),
}

/// Read-only inputs every handler may consult.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub crossref: &'a CrossRefMap,
    pub include_dir: &'a Path,
}

/// One reversible markup translation.
pub trait Handler {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Transform assembled HTML before the converter runs.
    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        Ok(lines)
    }

    /// Transform converter output into final LaTeX.
    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        Ok(lines)
    }
}

/// Every handler, in the order both phases apply them.
pub fn chain() -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(Inclusion),
        Box::new(GlossaryEntry),
        Box::new(CrossReference),
        Box::new(Figure),
        Box::new(Command),
        Box::new(CodeBlock),
        Box::new(Citation),
        Box::new(Substitution::LITERAL_NEWLINE),
        Box::new(SvgFigures),
        Box::new(Substitution::QUOTE),
        Box::new(Substitution::SECTION),
        Box::new(Substitution::SUBSECTION),
        Box::new(Substitution::SUBSUBSECTION),
        Box::new(Substitution::BIBLIOGRAPHY_TITLE),
        Box::new(Substitution::FRONT_MATTER),
        Box::new(Substitution::MAIN_MATTER),
        Box::new(Substitution::MIDPOINT),
        Box::new(SpecialCharacters),
    ]
}

// ============================================================================
// Shared line helpers
// ============================================================================

/// Line-by-line regex replacement where building the replacement can fail.
fn regexp<F>(lines: Lines, re: &Regex, mut render: F) -> Result<Lines, HandlerError>
where
    F: FnMut(&Captures<'_>) -> Result<String, HandlerError>,
{
    lines
        .into_iter()
        .map(|line| {
            if !re.is_match(&line) {
                return Ok(line);
            }
            let mut result = String::with_capacity(line.len());
            let mut last = 0;
            for caps in re.captures_iter(&line) {
                let Some(whole) = caps.get(0) else { continue };
                result.push_str(&line[last..whole.start()]);
                result.push_str(&render(&caps)?);
                last = whole.end();
            }
            result.push_str(&line[last..]);
            Ok(result)
        })
        .collect()
}

/// Line-by-line literal substitution.
fn replace(lines: Lines, before: &str, after: &str) -> Lines {
    lines
        .into_iter()
        .map(|line| {
            if line.contains(before) {
                line.replace(before, after)
            } else {
                line
            }
        })
        .collect()
}

/// Pre step shared by the markup handlers: HTML match → placeholder.
///
/// Capture groups `1..=arity` of `html` become the placeholder's parts. With
/// `emphasize`, the token is wrapped in `<strong>` so the converter keeps it
/// as inline text.
fn encode(lines: Lines, html: &Regex, kind: Kind, emphasize: bool) -> Result<Lines, HandlerError> {
    regexp(lines, html, |caps| {
        let token = Placeholder::from_captures(kind, caps)?;
        Ok(if emphasize {
            format!("<strong>{token}</strong>")
        } else {
            token.to_string()
        })
    })
}

/// Post step shared by the markup handlers: placeholder → LaTeX.
fn decode<F>(lines: Lines, kind: Kind, pattern: &Regex, mut render: F) -> Result<Lines, HandlerError>
where
    F: FnMut(Placeholder) -> Result<String, HandlerError>,
{
    lines
        .into_iter()
        .map(|line| placeholder::substitute(&line, kind, pattern, &mut render))
        .collect()
}
