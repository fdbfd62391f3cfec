use serde::{Deserialize, Serialize};

/// Bytes in one megabyte as reported in result files
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to megabytes without integer truncation
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// A successful VPN login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub date: String,
    pub time: String,
    pub user: String,
    #[serde(rename = "tunneltype")]
    pub tunnel_type: String,
    #[serde(rename = "remip")]
    pub remote_ip: String,
    pub reason: String,
    #[serde(rename = "msg")]
    pub message: String,
}

/// Outbound traffic total for one public destination IP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallEntry {
    #[serde(rename = "dstip")]
    pub destination_ip: String,
    #[serde(rename = "total_sentbyte")]
    pub total_sent_bytes: u64,
    pub size_mb: f64,
}

impl FirewallEntry {
    pub fn new(destination_ip: String, total_sent_bytes: u64) -> Self {
        FirewallEntry {
            destination_ip,
            total_sent_bytes,
            size_mb: bytes_to_mb(total_sent_bytes),
        }
    }
}

/// Bytes sent over one SSL tunnel, taken from its shutdown line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutdownRecord {
    pub date: String,
    pub time: String,
    pub user: String,
    #[serde(rename = "sentbyte")]
    pub sent_bytes: u64,
    #[serde(rename = "sent_bytes_in_MB")]
    pub sent_bytes_mb: f64,
}

impl ShutdownRecord {
    pub fn new(date: String, time: String, user: String, sent_bytes: u64) -> Self {
        ShutdownRecord {
            date,
            time,
            user,
            sent_bytes,
            sent_bytes_mb: bytes_to_mb(sent_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_mb_is_not_truncated() {
        assert_eq!(bytes_to_mb(1_048_576), 1.0);
        assert_eq!(bytes_to_mb(524_288), 0.5);
        assert!(bytes_to_mb(1) > 0.0);
    }

    #[test]
    fn test_firewall_entry_computes_size() {
        let entry = FirewallEntry::new("8.8.8.8".to_string(), 3_145_728);
        assert_eq!(entry.size_mb, 3.0);
    }

    #[test]
    fn test_shutdown_record_serializes_with_column_names() {
        let record = ShutdownRecord::new(
            "2024-01-15".to_string(),
            "12:00:00".to_string(),
            "alice".to_string(),
            2_097_152,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sentbyte"], 2_097_152);
        assert_eq!(value["sent_bytes_in_MB"], 2.0);
    }
}
