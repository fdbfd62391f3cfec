use std::io::{self, BufRead, Lines};

use super::rules::{
    DATE, DESTINATION_IP, MESSAGE, REASON, REMOTE_IP, SENT_BYTES, TIME, TUNNEL_TYPE, USER,
    USER_ANY_CASE,
};
use crate::analysis::{user_matches, NormalizedRow};

/// Message carried by the line that closes an SSL VPN session
pub const SHUTDOWN_MESSAGE: &str = "SSL tunnel shutdown";

/// Per-line extraction for each analysis
pub struct RawLogExtractor;

impl RawLogExtractor {
    /// All seven login fields, or `None` if any is missing
    pub fn login_row(line: &str) -> Option<NormalizedRow> {
        Some(NormalizedRow {
            date: Some(DATE.capture(line)?.to_string()),
            time: Some(TIME.capture(line)?.to_string()),
            user: Some(USER.capture(line)?.to_string()),
            tunnel_type: Some(TUNNEL_TYPE.capture(line)?.to_string()),
            remote_ip: Some(REMOTE_IP.capture(line)?.to_string()),
            reason: Some(REASON.capture(line)?.to_string()),
            message: Some(MESSAGE.capture(line)?.to_string()),
            ..Default::default()
        })
    }

    /// Destination IP and sent bytes, both required
    pub fn traffic_row(line: &str) -> Option<NormalizedRow> {
        let destination_ip = DESTINATION_IP.capture(line)?;
        let sent_bytes = SENT_BYTES.capture_u64(line)?;

        Some(NormalizedRow {
            destination_ip: Some(destination_ip.to_string()),
            sent_bytes: Some(sent_bytes),
            ..Default::default()
        })
    }

    /// A shutdown line for `target_user`
    ///
    /// The message must be exactly `SSL tunnel shutdown` and the user must
    /// match case-insensitively before date, time and sent bytes are looked at.
    pub fn shutdown_row(line: &str, target_user: &str) -> Option<NormalizedRow> {
        if MESSAGE.capture(line)? != SHUTDOWN_MESSAGE {
            return None;
        }

        let user = USER_ANY_CASE.capture(line)?;
        if !user_matches(user, target_user) {
            return None;
        }

        Some(NormalizedRow {
            date: Some(DATE.capture(line)?.to_string()),
            time: Some(TIME.capture(line)?.to_string()),
            user: Some(user.to_string()),
            message: Some(SHUTDOWN_MESSAGE.to_string()),
            sent_bytes: Some(SENT_BYTES.capture_u64(line)?),
            ..Default::default()
        })
    }

    /// Lazily apply `extract` to every line of `reader`
    pub fn rows<R, F>(reader: R, extract: F) -> RawRows<R, F>
    where
        R: BufRead,
        F: FnMut(&str) -> Option<NormalizedRow>,
    {
        RawRows {
            lines: reader.lines(),
            extract,
            error: None,
            lines_scanned: 0,
        }
    }
}

/// Iterator over the rows extracted from a line stream
///
/// Reading stops at the first I/O error, which is then reported by
/// `finish`. Lines the extractor rejects are skipped.
pub struct RawRows<R, F> {
    lines: Lines<R>,
    extract: F,
    error: Option<io::Error>,
    lines_scanned: usize,
}

impl<R, F> RawRows<R, F> {
    /// Number of lines scanned, or the I/O error that ended the scan
    pub fn finish(self) -> io::Result<usize> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.lines_scanned),
        }
    }
}

impl<R, F> Iterator for RawRows<R, F>
where
    R: BufRead,
    F: FnMut(&str) -> Option<NormalizedRow>,
{
    type Item = NormalizedRow;

    fn next(&mut self) -> Option<NormalizedRow> {
        if self.error.is_some() {
            return None;
        }

        for line in self.lines.by_ref() {
            match line {
                Ok(line) => {
                    self.lines_scanned += 1;
                    if let Some(row) = (self.extract)(&line) {
                        return Some(row);
                    }
                }
                Err(e) => {
                    self.error = Some(e);
                    return None;
                }
            }
        }
        None
    }
}
