//! Source format detection
//!
//! Looks at the first non-empty line of a file and decides whether it is
//! a CSV export or raw Fortinet `key=value` log text. Detection is advisory:
//! it never fails, and callers must still cope with missing fields.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::normalize::is_known_column;

/// Header fragments that identify a CSV export
const CSV_HEADER_FRAGMENTS: &[&str] = &["date,time,user", "dstip,sentbyte", "user,sentbyte"];

/// Format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Fortinet `key=value` log lines
    RawLog,
    /// CSV export with a header row
    Csv,
    /// Could not be classified (or could not be read)
    Unknown,
}

pub struct FormatDetector;

impl FormatDetector {
    /// Detect the format of the file at `path`
    ///
    /// Any I/O failure yields `SourceFormat::Unknown`.
    pub fn detect<P: AsRef<Path>>(path: P) -> SourceFormat {
        match Self::first_non_empty_line(path.as_ref()) {
            Some(line) => Self::classify_line(&line),
            None => SourceFormat::Unknown,
        }
    }

    /// Classify a single header/log line
    pub fn classify_line(line: &str) -> SourceFormat {
        let line = line.trim_start_matches('\u{feff}').trim();
        let lowered = line.to_lowercase();

        if CSV_HEADER_FRAGMENTS.iter().any(|f| lowered.contains(f)) || Self::looks_like_header(&lowered) {
            return SourceFormat::Csv;
        }

        if line.contains("date=") && line.contains("time=") {
            return SourceFormat::RawLog;
        }

        SourceFormat::Unknown
    }

    /// A comma-separated line of bare column identifiers, at least two of
    /// which the normalizer understands
    fn looks_like_header(lowered: &str) -> bool {
        let cells: Vec<&str> = lowered
            .split(',')
            .map(|c| c.trim().trim_matches('"').trim())
            .collect();

        let all_identifiers = cells.iter().all(|c| {
            !c.is_empty() && c.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        });
        if !all_identifiers {
            return false;
        }

        cells.iter().filter(|c| is_known_column(c)).count() >= 2
    }

    fn first_non_empty_line(path: &Path) -> Option<String> {
        let file = File::open(path).ok()?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line.ok()?;
            if !line.trim().is_empty() {
                return Some(line);
            }
        }
        None
    }
}
