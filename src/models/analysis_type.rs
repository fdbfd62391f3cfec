use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three analyses the parser can run over a log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Successful VPN logins
    Vpn,
    /// Outbound bytes aggregated per public destination IP
    Firewall,
    /// Bytes sent per SSL tunnel shutdown for a single user
    VpnShutdown,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Vpn => "vpn",
            AnalysisType::Firewall => "firewall",
            AnalysisType::VpnShutdown => "vpn_shutdown",
        }
    }

    /// Canonical CSV column order of the dataset this analysis produces
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            AnalysisType::Vpn => &["date", "time", "user", "tunneltype", "remip", "reason", "msg"],
            AnalysisType::Firewall => &["dstip", "total_sentbyte", "size_mb"],
            AnalysisType::VpnShutdown => &["date", "time", "user", "sentbyte", "sent_bytes_in_MB"],
        }
    }

    /// Whether this analysis needs a target user
    pub fn requires_user(&self) -> bool {
        matches!(self, AnalysisType::VpnShutdown)
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vpn" => Ok(AnalysisType::Vpn),
            "firewall" => Ok(AnalysisType::Firewall),
            "vpn_shutdown" => Ok(AnalysisType::VpnShutdown),
            other => Err(format!(
                "unknown analysis type '{}' (expected vpn, firewall or vpn_shutdown)",
                other
            )),
        }
    }
}
