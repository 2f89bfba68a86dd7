//! # booktex
//!
//! Turns a multi-page lesson website into the source of a single LaTeX book.
//! The site is the data source: its configuration orders the pages, its
//! Markdown numbers the sections, and its rendered HTML supplies the content.
//!
//! # Architecture: Two Phases Around a Converter
//!
//! The Markdown→LaTeX conversion itself is left to an external tool. This
//! crate runs on both sides of it, with a JSON cross-reference map handed
//! between the steps:
//!
//! ```text
//! 1. toc        _config.yml + {slug}.md  →  crossref.json   (anchor → "Section 2.4")
//! 2. pre        pages + crossref.json    →  book.html        (markup → placeholders)
//!    converter  book.html                →  book.raw.tex
//! 3. post       book.raw.tex             →  book.tex         (placeholders → LaTeX)
//! ```
//!
//! The converter drops or mangles markup it doesn't understand. Anything that
//! has to survive it (cross-references, glossary anchors, figures, code block
//! languages) is carried across as a plain-text [`placeholder`] token that the
//! same handler turns into LaTeX on the other side.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Book configuration loading (`_config.yml` or `.toml`) and validation |
//! | [`toc`] | Chapter/appendix labels and section numbering from Markdown headings |
//! | [`crossref`] | The anchor → display text map and its JSON form |
//! | [`locate`] | Extracts the main region from each rendered page |
//! | [`assemble`] | Concatenates pages in book order with structural markers |
//! | [`placeholder`] | The `==kind==part==` token grammar shared by all handlers |
//! | [`handlers`] | The fixed chain of pre/post markup translations |
//! | [`transform`] | Runs the chain for the pre and post phases |
//! | [`chars`] | Reports characters outside 7-bit ASCII |
//! | [`output`] | CLI output formatting for the report commands |
//! | [`types`] | The line buffer every stage passes around |
//!
//! # Design Decisions
//!
//! ## Lines Keep Their Terminators
//!
//! A line buffer is a `Vec<String>` whose entries still end in `\n`. Output is
//! plain concatenation, so a handler can splice, drop, or merge lines (the
//! command handler joins a line onto the next by dropping its newline) without
//! any separate bookkeeping.
//!
//! ## One Chain, Fixed Order
//!
//! Both phases walk the same handler list in the same order. A handler that
//! writes a placeholder in pre is the only one that reads it in post, and
//! every post step fails on a leftover token of its own kind. A token that
//! slips through is a build error, never a silent `==crossref==` in the book.
//!
//! ## Fail on Broken Structure
//!
//! A page without its main-region markers, a reference to an anchor nobody
//! defines, a replacement region that is never closed: each aborts the run.
//! The output is a book source; a partial one is worse than none.

pub mod assemble;
pub mod chars;
pub mod config;
pub mod crossref;
pub mod handlers;
pub mod locate;
pub mod output;
pub mod placeholder;
pub mod toc;
pub mod transform;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
