//! Placeholder tokens that carry markup across the external converter.
//!
//! The converter between the pre and post phases only understands text, so a
//! handler that needs to survive it writes its data inline as
//! `==kind==part==part==`. The converter passes those characters through
//! untouched; the same handler finds them again in its post step.
//!
//! Inside the crate a token is always a [`Placeholder`]: a [`Kind`] plus its
//! ordered parts, checked against the kind's arity. Text is only produced at
//! the pre-phase boundary ([`Placeholder`]'s `Display`) and only read back at
//! the post-phase boundary ([`substitute`]).
//!
//! | Kind | Parts | Example |
//! |------|-------|---------|
//! | `include` | file | `==include==license.tex==` |
//! | `crossref` | key | `==crossref==s:intro==` |
//! | `glossary` | key, term | `==glossary==g:cache==cache==` |
//! | `figure` | key, image, caption | `==figure==f:arch==./arch.svg==Overview==` |
//! | `citation` | keys | `==citation==Smith2001,Jones1999==` |
//! | `language` | language | `==language==python==` |
//! | `command` | command name | `==command==noindent==` |
//!
//! Parts may not be empty and may not contain `=`, since the post-phase
//! patterns match parts as `[^=]+`.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

pub const DELIMITER: &str = "==";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("Placeholder '{kind}' takes {expected} part(s), found {found}")]
    Arity {
        kind: Kind,
        expected: usize,
        found: usize,
    },
    #[error("Placeholder '{kind}' part {part:?} is empty or contains '='")]
    Collision { kind: Kind, part: String },
    #[error("Malformed '{kind}' placeholder in: {text}")]
    Malformed { kind: Kind, text: String },
}

/// What a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Include,
    CrossRef,
    Glossary,
    Figure,
    Citation,
    Language,
    Command,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Include,
        Kind::CrossRef,
        Kind::Glossary,
        Kind::Figure,
        Kind::Citation,
        Kind::Language,
        Kind::Command,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Include => "include",
            Kind::CrossRef => "crossref",
            Kind::Glossary => "glossary",
            Kind::Figure => "figure",
            Kind::Citation => "citation",
            Kind::Language => "language",
            Kind::Command => "command",
        }
    }

    /// Number of parts a well-formed token carries.
    pub fn arity(self) -> usize {
        match self {
            Kind::Glossary => 2,
            Kind::Figure => 3,
            _ => 1,
        }
    }

    /// The `==kind==` prefix every token of this kind starts with.
    pub fn opener(self) -> String {
        format!("{DELIMITER}{}{DELIMITER}", self.name())
    }

    /// Pattern matching a well-formed token, one capture group per part.
    pub fn pattern(self) -> &'static Regex {
        static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
            Kind::ALL
                .iter()
                .map(|kind| {
                    let parts = "([^=]+)==".repeat(kind.arity());
                    Regex::new(&format!("=={}=={parts}", kind.name())).expect("valid regex")
                })
                .collect()
        });
        &PATTERNS[self as usize]
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    kind: Kind,
    parts: Vec<String>,
}

impl Placeholder {
    /// Build a token, checking arity and that every part can be encoded.
    pub fn new<I, S>(kind: Kind, parts: I) -> Result<Self, PlaceholderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.len() != kind.arity() {
            return Err(PlaceholderError::Arity {
                kind,
                expected: kind.arity(),
                found: parts.len(),
            });
        }
        if let Some(bad) = parts.iter().find(|p| p.is_empty() || p.contains('=')) {
            return Err(PlaceholderError::Collision {
                kind,
                part: bad.clone(),
            });
        }
        Ok(Self { kind, parts })
    }

    /// Decode the parts captured by a pattern whose groups 1..=arity are parts.
    pub fn from_captures(kind: Kind, caps: &Captures<'_>) -> Result<Self, PlaceholderError> {
        let parts = (1..=kind.arity()).map(|i| caps.get(i).map_or("", |m| m.as_str()));
        Self::new(kind, parts)
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The first part; every kind has at least one.
    pub fn value(&self) -> &str {
        &self.parts[0]
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.opener())?;
        for part in &self.parts {
            write!(f, "{part}{DELIMITER}")?;
        }
        Ok(())
    }
}

/// Replace every token of `kind` matched by `pattern` in `line`.
///
/// `pattern` must capture the token's parts as groups `1..=arity`; anything
/// else it matches (such as a trailing newline) is consumed along with the
/// token. Any `==kind==` opener left in the unmatched text means a token with
/// the wrong number of parts, and is reported as malformed.
pub fn substitute<F, E>(line: &str, kind: Kind, pattern: &Regex, mut render: F) -> Result<String, E>
where
    F: FnMut(Placeholder) -> Result<String, E>,
    E: From<PlaceholderError>,
{
    let opener = kind.opener();
    let malformed = || PlaceholderError::Malformed {
        kind,
        text: line.trim_end().to_string(),
    };

    let mut result = String::with_capacity(line.len());
    let mut last = 0;
    for caps in pattern.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        let between = &line[last..whole.start()];
        if between.contains(&opener) {
            return Err(malformed().into());
        }
        result.push_str(between);
        result.push_str(&render(Placeholder::from_captures(kind, &caps)?)?);
        last = whole.end();
    }
    let tail = &line[last..];
    if tail.contains(&opener) {
        return Err(malformed().into());
    }
    result.push_str(tail);
    Ok(result)
}
