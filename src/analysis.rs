//! Format-independent half of every analysis
//!
//! Both the raw-log extractor and the CSV normalizer reduce their input to
//! `NormalizedRow`s. Everything after that point (record assembly, public-IP
//! filtering, aggregation, megabyte computation, user matching) lives here
//! and is shared by the two paths.

use crate::aggregation::{PublicIpClassifier, TrafficAggregator};
use crate::models::{FirewallEntry, LogRecord, ShutdownRecord};

/// One input row reduced to the fields an analysis cares about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    pub date: Option<String>,
    pub time: Option<String>,
    pub user: Option<String>,
    pub tunnel_type: Option<String>,
    pub remote_ip: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub destination_ip: Option<String>,
    pub sent_bytes: Option<u64>,
}

impl NormalizedRow {
    /// All seven login fields, or nothing
    pub fn into_login_record(self) -> Option<LogRecord> {
        Some(LogRecord {
            date: self.date?,
            time: self.time?,
            user: self.user?,
            tunnel_type: self.tunnel_type?,
            remote_ip: self.remote_ip?,
            reason: self.reason?,
            message: self.message?,
        })
    }

    pub fn into_traffic(self) -> Option<(String, u64)> {
        Some((self.destination_ip?, self.sent_bytes?))
    }

    pub fn into_shutdown_record(self) -> Option<ShutdownRecord> {
        Some(ShutdownRecord::new(self.date?, self.time?, self.user?, self.sent_bytes?))
    }
}

/// How a login's `reason` is judged successful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessMatch {
    /// Case-insensitive equality with "login successfully" (raw logs)
    Exact,
    /// Case-insensitive substring "success" (CSV exports)
    Contains,
}

impl SuccessMatch {
    pub fn matches(&self, reason: &str) -> bool {
        let reason = reason.to_lowercase();
        match self {
            SuccessMatch::Exact => reason == "login successfully",
            SuccessMatch::Contains => reason.contains("success"),
        }
    }
}

/// Case-insensitive exact user comparison
pub fn user_matches(candidate: &str, target: &str) -> bool {
    candidate.to_lowercase() == target.to_lowercase()
}

/// Complete login records whose reason counts as a success
pub fn collect_logins<I>(rows: I, success: SuccessMatch) -> Vec<LogRecord>
where
    I: IntoIterator<Item = NormalizedRow>,
{
    rows.into_iter()
        .filter_map(NormalizedRow::into_login_record)
        .filter(|r| success.matches(&r.reason))
        .collect()
}

/// Sum sent bytes per public destination IP, largest first
pub fn aggregate_traffic<I>(rows: I) -> Vec<FirewallEntry>
where
    I: IntoIterator<Item = NormalizedRow>,
{
    let mut aggregator = TrafficAggregator::new();
    let mut skipped = 0usize;

    for (ip, bytes) in rows.into_iter().filter_map(NormalizedRow::into_traffic) {
        if PublicIpClassifier::is_public(&ip) {
            aggregator.add(ip, bytes);
        } else {
            skipped += 1;
        }
    }

    log::debug!(
        "Aggregated {} public destination(s), skipped {} non-public row(s)",
        aggregator.len(),
        skipped
    );
    aggregator.finish()
}

/// Shutdown records with all four fields present
pub fn collect_shutdowns<I>(rows: I) -> Vec<ShutdownRecord>
where
    I: IntoIterator<Item = NormalizedRow>,
{
    rows.into_iter()
        .filter_map(NormalizedRow::into_shutdown_record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_row(reason: &str) -> NormalizedRow {
        NormalizedRow {
            date: Some("2024-01-15".to_string()),
            time: Some("10:30:00".to_string()),
            user: Some("alice".to_string()),
            tunnel_type: Some("ssl-web".to_string()),
            remote_ip: Some("10.1.1.1".to_string()),
            reason: Some(reason.to_string()),
            message: Some("SSL tunnel established".to_string()),
            ..Default::default()
        }
    }

    fn traffic(ip: &str, bytes: u64) -> NormalizedRow {
        NormalizedRow {
            destination_ip: Some(ip.to_string()),
            sent_bytes: Some(bytes),
            ..Default::default()
        }
    }

    #[test]
    fn test_login_requires_every_field() {
        assert!(login_row("login successfully").into_login_record().is_some());

        let mut row = login_row("login successfully");
        row.remote_ip = None;
        assert!(row.into_login_record().is_none());
    }

    #[test]
    fn test_success_match_modes() {
        assert!(SuccessMatch::Exact.matches("Login Successfully"));
        assert!(!SuccessMatch::Exact.matches("login successfully via token"));
        assert!(SuccessMatch::Contains.matches("SUCCESS"));
        assert!(SuccessMatch::Contains.matches("login successfully via token"));
        assert!(!SuccessMatch::Contains.matches("login failed"));
    }

    #[test]
    fn test_collect_logins_filters_reason() {
        let rows = vec![login_row("login successfully"), login_row("login failed")];
        let records = collect_logins(rows, SuccessMatch::Exact);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reason, "login successfully");
    }

    #[test]
    fn test_aggregate_traffic_drops_private_and_sums() {
        let rows = vec![
            traffic("8.8.8.8", 100),
            traffic("10.0.0.5", 5000),
            traffic("1.1.1.1", 300),
            traffic("8.8.8.8", 250),
            traffic("garbage", 1),
        ];
        let entries = aggregate_traffic(rows);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].destination_ip, "8.8.8.8");
        assert_eq!(entries[0].total_sent_bytes, 350);
        assert_eq!(entries[1].destination_ip, "1.1.1.1");
        assert_eq!(entries[1].total_sent_bytes, 300);
    }

    #[test]
    fn test_collect_shutdowns_computes_mb() {
        let row = NormalizedRow {
            date: Some("2024-01-15".to_string()),
            time: Some("12:00:00".to_string()),
            user: Some("Alice".to_string()),
            sent_bytes: Some(1_572_864),
            ..Default::default()
        };
        let records = collect_shutdowns(vec![row, NormalizedRow::default()]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sent_bytes_mb, 1.5);
    }

    #[test]
    fn test_user_matches_ignores_case_only() {
        assert!(user_matches("Alice", "ALICE"));
        assert!(!user_matches("alice2", "alice"));
    }
}
