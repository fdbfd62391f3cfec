//! Errors surfaced by a parse invocation
//!
//! Only conditions that abort the whole parse live here. Row-level
//! anomalies (a missing optional field, an unparseable IP, a byte count
//! that will not coerce) are resolved where they occur and never escalate.

use std::path::Path;
use thiserror::Error;

/// Fatal parse failures
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unreadable file {path}: {reason}")]
    UnreadableFile { path: String, reason: String },

    #[error("Required columns {} not found in CSV", .missing.join(", "))]
    FormatError { missing: Vec<String> },

    #[error("A target user is required for vpn_shutdown analysis")]
    MissingUserFilter,

    #[error("Parse task failed: {0}")]
    Task(String),
}

impl ParseError {
    pub(crate) fn unreadable(path: &Path, reason: impl ToString) -> Self {
        ParseError::UnreadableFile {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
