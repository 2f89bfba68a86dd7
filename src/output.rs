//! CLI output formatting for the report commands.
//!
//! `toc` and `transform` write pipeline data to stdout and need no
//! formatting. The two report commands do:
//!
//! ## Check
//!
//! Information-first: each page leads with its book label and anchor key.
//! Source files are shown as indented context lines.
//!
//! ```text
//! Front matter
//!     Source: index.html (4 lines)
//!
//! Chapters
//! 001 Chapter 1 → s:intro
//!     Source: intro.md, intro/index.html (9 lines)
//!     001 Section 1.1 → s:intro-why
//! 002 Chapter 2 → s:tools
//!     Source: tools.md, tools/index.html (12 lines)
//!
//! Appendices
//! 001 Appendix A → s:glossary
//!     Source: glossary.md, glossary/index.html (5 lines)
//!     001 Section A.1 → s:glossary-terms
//!
//! 3 pages, 30 lines, 2 sections
//! ```
//!
//! ## Check chars
//!
//! ```text
//! glossary/index.html 9 99: <p>... Schrödinger might say.</p>
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::assemble::Book;
use crate::chars::CharHit;
use crate::toc::{Label, Outline, OutlineEntry};
use std::collections::HashMap;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format one chapter or appendix with its sections.
fn entry_lines(index: usize, entry: &OutlineEntry, line_count: Option<usize>) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} → {}",
        format_index(index),
        entry.label,
        entry.key()
    )];
    let page = format!("{}/index.html", entry.slug);
    lines.push(match line_count {
        Some(n) => format!("{}Source: {}.md, {} ({} lines)", indent(1), entry.slug, page, n),
        None => format!("{}Source: {}.md, {}", indent(1), entry.slug, page),
    });
    for (i, section) in entry.sections.iter().enumerate() {
        lines.push(format!(
            "{}{} {} → {}",
            indent(1),
            format_index(i + 1),
            section.text,
            section.key
        ));
    }
    lines
}

/// Format the book outline the `check` command verified.
pub fn format_check_output(outline: &Outline, book: &Book) -> Vec<String> {
    let counts: HashMap<&str, usize> = book
        .lessons
        .iter()
        .chain(&book.extras)
        .map(|page| (page.slug.as_str(), page.lines.len()))
        .collect();

    let mut lines = vec![
        "Front matter".to_string(),
        format!("{}Source: index.html ({} lines)", indent(1), book.front.len()),
    ];

    let (chapters, appendices): (Vec<&OutlineEntry>, Vec<&OutlineEntry>) = outline
        .entries
        .iter()
        .partition(|entry| matches!(entry.label, Label::Chapter(_)));

    for (title, entries) in [("Chapters", chapters), ("Appendices", appendices)] {
        if entries.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(title.to_string());
        for (i, entry) in entries.iter().enumerate() {
            let count = counts.get(entry.slug.as_str()).copied();
            lines.extend(entry_lines(i + 1, entry, count));
        }
    }

    let sections: usize = outline.entries.iter().map(|e| e.sections.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "{} pages, {} lines, {} sections",
        outline.entries.len(),
        book.line_count(),
        sections
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(outline: &Outline, book: &Book) {
    for line in format_check_output(outline, book) {
        println!("{}", line);
    }
}

/// Format non-ASCII hits, one per line.
pub fn format_char_hits(hits: &[CharHit]) -> Vec<String> {
    hits.iter().map(CharHit::to_string).collect()
}

/// Print non-ASCII hits to stdout.
pub fn print_char_hits(hits: &[CharHit]) {
    for line in format_char_hits(hits) {
        println!("{}", line);
    }
}
