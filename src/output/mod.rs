//! Result files and job summaries

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{AnalysisType, Dataset};

/// Errors that can occur while writing results
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File type not allowed: {0}")]
    ExtensionNotAllowed(String),
}

/// Reject inputs whose extension is not in `allowed` (case-insensitive)
pub fn check_extension(path: &Path, allowed: &[String]) -> Result<(), OutputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if allowed.iter().any(|a| a.to_lowercase() == ext) {
        Ok(())
    } else {
        Err(OutputError::ExtensionNotAllowed(path.display().to_string()))
    }
}

/// Keep only characters safe in a file name
fn sanitize(part: &str) -> String {
    let cleaned: String = part
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    cleaned.trim_matches('.').to_string()
}

/// Name of the CSV a parse result is stored under
///
/// `vpn_parsed_<ts>.csv`, `firewall_parsed_<ts>.csv` or
/// `vpn_shutdown_<user>_<ts>.csv`, with `<ts>` as `%Y%m%d_%H%M%S`.
pub fn result_file_name(
    analysis: AnalysisType,
    user_filter: Option<&str>,
    timestamp: &DateTime<Local>,
) -> String {
    let ts = timestamp.format("%Y%m%d_%H%M%S");
    match (analysis, user_filter.map(sanitize)) {
        (AnalysisType::VpnShutdown, Some(user)) if !user.is_empty() => {
            format!("vpn_shutdown_{}_{}.csv", user, ts)
        }
        (AnalysisType::VpnShutdown, _) => format!("vpn_shutdown_{}.csv", ts),
        (other, _) => format!("{}_parsed_{}.csv", other, ts),
    }
}

/// Writes datasets as CSV files
pub struct ResultWriter {
    results_dir: PathBuf,
}

impl ResultWriter {
    pub fn new(results_dir: PathBuf) -> Self {
        ResultWriter { results_dir }
    }

    /// Write into the results directory under the conventional name
    pub fn write(&self, dataset: &Dataset, user_filter: Option<&str>) -> Result<PathBuf, OutputError> {
        std::fs::create_dir_all(&self.results_dir)?;
        let name = result_file_name(dataset.analysis(), user_filter, &Local::now());
        let path = self.results_dir.join(name);
        Self::write_to(dataset, &path)?;
        Ok(path)
    }

    /// Write to an explicit path
    pub fn write_to(dataset: &Dataset, path: &Path) -> Result<(), OutputError> {
        let file = File::create(path)?;
        dataset.write_csv(BufWriter::new(file))?;
        log::info!("Wrote {} record(s) to {}", dataset.record_count(), path.display());
        Ok(())
    }
}

/// What a finished parse job reports back to its caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub analysis: AnalysisType,
    pub records: usize,
    pub filename: Option<String>,
    pub preview: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_mb: Option<f64>,
}

impl JobSummary {
    pub fn from_dataset(
        dataset: &Dataset,
        written_to: Option<&Path>,
        preview_rows: usize,
    ) -> Result<Self, OutputError> {
        Ok(JobSummary {
            analysis: dataset.analysis(),
            records: dataset.record_count(),
            filename: written_to
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned()),
            preview: dataset.preview(preview_rows)?,
            total_mb: dataset.total_sent_mb(),
        })
    }

    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FirewallEntry, ShutdownRecord};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_result_file_names() {
        let ts = timestamp();
        assert_eq!(result_file_name(AnalysisType::Vpn, None, &ts), "vpn_parsed_20240115_103000.csv");
        assert_eq!(
            result_file_name(AnalysisType::Firewall, Some("ignored"), &ts),
            "firewall_parsed_20240115_103000.csv"
        );
        assert_eq!(
            result_file_name(AnalysisType::VpnShutdown, Some("Alice"), &ts),
            "vpn_shutdown_Alice_20240115_103000.csv"
        );
    }

    #[test]
    fn test_user_is_sanitized_in_file_name() {
        let name = result_file_name(AnalysisType::VpnShutdown, Some("../doe jane"), &timestamp());
        assert_eq!(name, "vpn_shutdown__doe_jane_20240115_103000.csv");
    }

    #[test]
    fn test_check_extension() {
        let allowed = vec!["txt".to_string(), "log".to_string(), "csv".to_string()];
        assert!(check_extension(Path::new("fw.LOG"), &allowed).is_ok());
        assert!(check_extension(Path::new("export.csv"), &allowed).is_ok());
        assert!(matches!(
            check_extension(Path::new("payload.exe"), &allowed),
            Err(OutputError::ExtensionNotAllowed(_))
        ));
        assert!(check_extension(Path::new("noext"), &allowed).is_err());
    }

    #[test]
    fn test_writer_creates_dir_and_file() {
        let dir = tempdir().unwrap();
        let writer = ResultWriter::new(dir.path().join("results"));
        let dataset = Dataset::Firewall(vec![FirewallEntry::new("8.8.8.8".to_string(), 2048)]);

        let path = writer.write(&dataset, None).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("firewall_parsed_"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("dstip,total_sentbyte,size_mb\n8.8.8.8,2048,"));
    }

    #[test]
    fn test_job_summary() {
        let dataset = Dataset::VpnShutdown(vec![ShutdownRecord::new(
            "2024-01-15".to_string(),
            "12:00:00".to_string(),
            "alice".to_string(),
            1_048_576,
        )]);
        let path = PathBuf::from("results/vpn_shutdown_alice_20240115_120000.csv");

        let summary = JobSummary::from_dataset(&dataset, Some(path.as_path()), 10).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.filename.as_deref(), Some("vpn_shutdown_alice_20240115_120000.csv"));
        assert_eq!(summary.total_mb, Some(1.0));

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"analysis\": \"vpn_shutdown\""));
    }

    #[test]
    fn test_vpn_summary_has_no_total() {
        let summary = JobSummary::from_dataset(&Dataset::empty(AnalysisType::Vpn), None, 10).unwrap();
        assert!(summary.total_mb.is_none());
        assert!(!summary.to_json().unwrap().contains("total_mb"));
    }
}
