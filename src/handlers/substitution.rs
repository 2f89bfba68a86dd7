//! Post-only fixes to the converter's LaTeX and the assembler's markers.
//!
//! None of these need a placeholder: each replaces one exact string with
//! another wherever it appears.

use super::{Context, Handler, HandlerError, regexp, replace};
use crate::assemble::Marker;
use crate::types::Lines;
use regex::Regex;
use std::sync::LazyLock;

/// A literal one-for-one replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    name: &'static str,
    from: &'static str,
    to: &'static str,
}

impl Substitution {
    pub const LITERAL_NEWLINE: Self = Self {
        name: "literal-newline",
        from: r"\texttt{\n}",
        to: r"\texttt{\textbackslash n}",
    };

    /// Quotations are set flush left.
    pub const QUOTE: Self = Self {
        name: "quote",
        from: r"\begin{quote}",
        to: r"\begin{quote}\setlength{\parindent}{0pt}",
    };

    // Web pages use `#` for the page title, so each heading level moves up one
    // in the book. Must run section, subsection, subsubsection in that order.
    pub const SECTION: Self = Self {
        name: "section",
        from: r"\section",
        to: r"\chapter",
    };
    pub const SUBSECTION: Self = Self {
        name: "subsection",
        from: r"\subsection",
        to: r"\section",
    };
    pub const SUBSUBSECTION: Self = Self {
        name: "subsubsection",
        from: r"\subsubsection",
        to: r"\subsection",
    };

    /// The bibliography is an unnumbered chapter. Runs after [`Self::SECTION`].
    pub const BIBLIOGRAPHY_TITLE: Self = Self {
        name: "bibliography-title",
        from: r"\chapter{Bibliography}",
        to: r"\chapter*{Bibliography}",
    };

    pub const FRONT_MATTER: Self = Self {
        name: "front-matter",
        from: Marker::FrontMatter.token(),
        to: r"\frontmatter",
    };
    pub const MAIN_MATTER: Self = Self {
        name: "main-matter",
        from: Marker::MainMatter.token(),
        to: r"\mainmatter",
    };

    /// Bibliography goes between the lessons and the appendices.
    pub const MIDPOINT: Self = Self {
        name: "midpoint",
        from: Marker::Midpoint.token(),
        to: "\\bibliographystyle{abstract}\n\\bibliography{book}\n\\appendix",
    };
}

impl Handler for Substitution {
    fn name(&self) -> &'static str {
        self.name
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        Ok(replace(lines, self.from, self.to))
    }
}

static SVG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/figures/([^}]+)\.svg\}").expect("valid regex"));

/// SVG figures are included as PDFs rendered from the same source.
///
/// The base name is braced so dots in it don't confuse `\includegraphics`.
pub struct SvgFigures;

impl Handler for SvgFigures {
    fn name(&self) -> &'static str {
        "svg-figures"
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        regexp(lines, &SVG_RE, |caps| Ok(format!("/figures/{{{}}}.pdf}}", &caps[1])))
    }
}

/// Characters the book's font setup can't take as UTF-8. Extend by adding rows.
const SPECIAL_CHARACTERS: &[(&str, &str)] = &[("é", r"\'{e}"), ("ö", r#"\"{o}"#)];

pub struct SpecialCharacters;

impl Handler for SpecialCharacters {
    fn name(&self) -> &'static str {
        "special-characters"
    }

    fn post(&self, _ctx: &Context<'_>, lines: Lines) -> Result<Lines, HandlerError> {
        Ok(SPECIAL_CHARACTERS
            .iter()
            .fold(lines, |lines, (raw, latex)| replace(lines, raw, latex)))
    }
}
