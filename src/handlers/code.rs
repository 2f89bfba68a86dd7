//! Fenced code blocks with a language become `lstlisting` environments.
//!
//! The site renders a fence as `<div class="language-python" ...>`; the
//! converter turns the block into a bare `verbatim` environment and loses the
//! language. Pre writes a `==language==python==` marker in front of the div.
//! The converter emits the marker as its own paragraph, usually followed by
//! blank lines and then `\begin{verbatim}`.
//!
//! Post runs in three steps:
//!
//! 1. squash: drop the blank lines after a marker and glue the marker onto
//!    the next line, so it sits directly in front of `\begin{verbatim}`
//! 2. marker + `\begin{verbatim}` → `\begin{lstlisting}[language=L]`
//! 3. any remaining `verbatim` start/end → plain `lstlisting`
//!
//! Squashing assumes only blank lines separate the marker from the verbatim
//! start. Anything else leaves the marker unmatched and fails in step 2.

use super::{Context, Handler, HandlerError, decode, regexp, replace};
use crate::placeholder::{Kind, Placeholder, PlaceholderError};
use crate::types::Lines;
use regex::Regex;
use std::sync::LazyLock;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div class="language-([^ "]+)[^>]*>"#).expect("valid regex")
});

static LISTING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"==language==([^=]+)==\\begin\{verbatim\}").expect("valid regex")
});

const BEGIN_VERBATIM: &str = r"\begin{verbatim}";
const END_VERBATIM: &str = r"\end{verbatim}";
const BEGIN_LISTING: &str = r"\begin{lstlisting}";
const END_LISTING: &str = r"\end{lstlisting}";

/// Plain text blocks get a shaded background instead of syntax colouring.
const PLAIN_LANGUAGE: &str = "text";

pub struct CodeBlock;

impl Handler for CodeBlock {
    fn name(&self) -> &'static str {
        "code-block"
    }

    fn pre(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        regexp(lines, &FENCE_RE, |caps| {
            let token = Placeholder::from_captures(Kind::Language, caps)?;
            Ok(format!("{token}{}", &caps[0]))
        })
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        let lines = squash(lines)?;
        let lines = decode(lines, Kind::Language, &LISTING_RE, |token| {
            Ok(match token.value() {
                PLAIN_LANGUAGE => {
                    format!(r"{BEGIN_LISTING}[backgroundcolor=\color{{verylightgray}}]")
                }
                language => format!("{BEGIN_LISTING}[language={language}]"),
            })
        })?;
        let lines = replace(lines, BEGIN_VERBATIM, BEGIN_LISTING);
        Ok(replace(lines, END_VERBATIM, END_LISTING))
    }
}

/// Move each language marker onto the first non-blank line after it.
///
/// Text before a marker on its line stays behind as a line of its own; text
/// after it counts as the next line.
fn squash(lines: Lines) -> Result<Lines, HandlerError> {
    let mut pending: Option<Placeholder> = None;
    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(token) = pending.take() {
            if line.trim().is_empty() {
                pending = Some(token);
            } else {
                result.push(format!("{token}{line}"));
            }
            continue;
        }
        let found = Kind::Language.pattern().captures(&line).map(|caps| {
            let span = caps.get(0).map_or(0..line.len(), |m| m.range());
            (span, Placeholder::from_captures(Kind::Language, &caps))
        });
        let Some((span, token)) = found else {
            result.push(line);
            continue;
        };
        let token = token?;
        let prefix = &line[..span.start];
        if !prefix.trim().is_empty() {
            result.push(format!("{}\n", prefix.trim_end()));
        }
        let rest = &line[span.end..];
        if rest.trim().is_empty() {
            pending = Some(token);
        } else {
            result.push(format!("{token}{rest}"));
        }
    }
    match pending {
        None => Ok(result),
        Some(token) => Err(PlaceholderError::Malformed {
            kind: Kind::Language,
            text: token.to_string(),
        }
        .into()),
    }
}
