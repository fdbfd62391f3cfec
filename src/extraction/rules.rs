use once_cell::sync::Lazy;
use regex::Regex;

/// A single named capture searched for anywhere in a line
pub struct FieldRule {
    regex: Regex,
}

impl FieldRule {
    fn new(pattern: &str) -> Self {
        FieldRule {
            regex: Regex::new(pattern).expect("field rule pattern is valid"),
        }
    }

    /// Value of the first occurrence of this field in `line`
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Captured value parsed as an unsigned byte count
    ///
    /// A value too large for u64 counts as no match.
    pub fn capture_u64(&self, line: &str) -> Option<u64> {
        self.capture(line).and_then(|v| v.parse().ok())
    }
}

// Tokens are anchored on a word boundary so `eventtime=` or `srcuser=`
// are never mistaken for `time=` or `user=`.
pub static DATE: Lazy<FieldRule> = Lazy::new(|| FieldRule::new(r"\bdate=(\S+)"));
pub static TIME: Lazy<FieldRule> = Lazy::new(|| FieldRule::new(r"\btime=(\S+)"));
pub static USER: Lazy<FieldRule> = Lazy::new(|| FieldRule::new(r#"\buser="([^"]+)""#));
pub static USER_ANY_CASE: Lazy<FieldRule> =
    Lazy::new(|| FieldRule::new(r#"(?i)\buser="([^"]+)""#));
pub static TUNNEL_TYPE: Lazy<FieldRule> =
    Lazy::new(|| FieldRule::new(r#"\btunneltype="([^"]+)""#));
pub static REMOTE_IP: Lazy<FieldRule> = Lazy::new(|| FieldRule::new(r"\bremip=([\d.]+)"));
pub static REASON: Lazy<FieldRule> = Lazy::new(|| FieldRule::new(r#"\breason="([^"]+)""#));
pub static MESSAGE: Lazy<FieldRule> = Lazy::new(|| FieldRule::new(r#"\bmsg="([^"]+)""#));
pub static DESTINATION_IP: Lazy<FieldRule> =
    Lazy::new(|| FieldRule::new(r"\bdstip=([\d.]+)"));
pub static SENT_BYTES: Lazy<FieldRule> =
    Lazy::new(|| FieldRule::new(r"\bsentbyte=(\d+)"));
