//! Non-ASCII character report.
//!
//! The book's LaTeX setup only handles the characters the special-character
//! table knows about. This scan finds every line that still contains
//! anything outside 7-bit ASCII so it can be fixed in the source or added to
//! the table.
//!
//! One hit is reported per line, at the first offending character. Columns
//! count characters, not bytes, and both lines and columns start at 1.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Name reported for text read from standard input.
pub const STDIN_NAME: &str = "--";

#[derive(Error, Debug)]
pub enum CharsError {
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot read standard input: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("Cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A line containing a non-ASCII character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharHit {
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// The whole line, trailing whitespace removed.
    pub text: String,
}

impl fmt::Display for CharHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}: {}", self.file, self.line, self.column, self.text)
    }
}

/// Scan already-loaded text, reporting hits under `name`.
pub fn scan_text(name: &str, text: &str) -> Vec<CharHit> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let column = line.chars().position(|c| !c.is_ascii())?;
            Some(CharHit {
                file: name.to_string(),
                line: i + 1,
                column: column + 1,
                text: line.trim_end().to_string(),
            })
        })
        .collect()
}

/// Every file under `paths`, directories walked recursively in name order.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CharsError> {
    let mut files = Vec::new();
    for path in paths {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

/// Scan one file. Invalid UTF-8 shows up as U+FFFD and is reported too.
pub fn check_file(path: &Path) -> Result<Vec<CharHit>, CharsError> {
    let bytes = fs::read(path).map_err(|source| CharsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let hits = scan_text(&path.display().to_string(), &String::from_utf8_lossy(&bytes));
    debug!(path = %path.display(), hits = hits.len(), "checked");
    Ok(hits)
}

/// Scan every file under `paths`.
pub fn check_paths(paths: &[PathBuf]) -> Result<Vec<CharHit>, CharsError> {
    let mut hits = Vec::new();
    for file in collect_files(paths)? {
        hits.extend(check_file(&file)?);
    }
    Ok(hits)
}

/// Scan a stream, reported as `--`.
pub fn check_reader<R: Read>(mut reader: R) -> Result<Vec<CharHit>, CharsError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(CharsError::Stdin)?;
    Ok(scan_text(STDIN_NAME, &String::from_utf8_lossy(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn ascii_text_has_no_hits() {
        assert!(scan_text("a.md", "plain\ntext only\n").is_empty());
    }

    #[test]
    fn first_offending_character_per_line() {
        let hits = scan_text("a.md", "ok\ncafé and naïve\n");
        assert_eq!(
            hits,
            vec![CharHit {
                file: "a.md".into(),
                line: 2,
                column: 4,
                text: "café and naïve".into(),
            }]
        );
    }

    #[test]
    fn column_counts_characters_not_bytes() {
        let hits = scan_text("a.md", "éé ö\n");
        assert_eq!(hits[0].column, 1);
        let hits = scan_text("a.md", "ab×c\n");
        assert_eq!(hits[0].column, 3);
    }

    #[test]
    fn display_format() {
        let hit = CharHit {
            file: "src/intro.md".into(),
            line: 12,
            column: 7,
            text: "naïve".into(),
        };
        assert_eq!(hit.to_string(), "src/intro.md 12 7: naïve");
    }

    #[test]
    fn trailing_whitespace_trimmed_from_text() {
        let hits = scan_text("a.md", "ö   \r\n");
        assert_eq!(hits[0].text, "ö");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9\n").unwrap();

        let hits = check_file(&path).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].column, 4);
    }

    #[test]
    fn directories_walked_in_name_order() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b.md", "ö\n");
        write_file(tmp.path(), "a/deep.md", "é\n");
        write_file(tmp.path(), "c.md", "plain\n");

        let hits = check_paths(&[tmp.path().to_path_buf()]).unwrap();
        let files: Vec<&str> = hits.iter().map(|h| h.file.as_str()).collect();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("deep.md"));
        assert!(files[1].ends_with("b.md"));
    }

    #[test]
    fn missing_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = check_paths(&[tmp.path().join("absent.md")]);
        assert!(matches!(result, Err(CharsError::Walk(_))));
    }

    #[test]
    fn reader_reported_as_stdin() {
        let hits = check_reader("x\nÄ\n".as_bytes()).unwrap();
        assert_eq!(hits[0].file, "--");
        assert_eq!(hits[0].line, 2);
    }

    #[test]
    fn fixture_glossary_has_one_hit() {
        let tmp = setup_fixtures();
        let hits = check_paths(&[tmp.path().join("glossary")]).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].text.contains("Schrödinger"));
    }
}
