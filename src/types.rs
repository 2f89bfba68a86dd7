//! Shared types used across both transform phases.
//!
//! A [`Lines`] buffer is what flows from the assembler through every handler
//! and out to the converter. Each entry keeps its own line terminator, so a
//! handler can splice file contents in, or join a line onto its successor by
//! dropping the trailing `\n`, and writing the buffer back out is plain
//! concatenation.

/// An ordered buffer of text lines, each carrying its own terminator.
pub type Lines = Vec<String>;

/// Split text into a [`Lines`] buffer, keeping every `\n`.
///
/// The last entry has no terminator if the text does not end with one.
pub fn split_lines(text: &str) -> Lines {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// Concatenate a buffer back into one string.
pub fn join_lines(lines: &[String]) -> String {
    lines.concat()
}
