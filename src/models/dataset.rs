//! The tabular result of one parse invocation

use serde::Serialize;
use std::io::{self, Write};

use super::{AnalysisType, FirewallEntry, LogRecord, ShutdownRecord};

/// Ordered records of a single analysis, in canonical column order
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Vpn(Vec<LogRecord>),
    Firewall(Vec<FirewallEntry>),
    VpnShutdown(Vec<ShutdownRecord>),
}

impl Dataset {
    /// An empty dataset for the given analysis
    pub fn empty(analysis: AnalysisType) -> Self {
        match analysis {
            AnalysisType::Vpn => Dataset::Vpn(Vec::new()),
            AnalysisType::Firewall => Dataset::Firewall(Vec::new()),
            AnalysisType::VpnShutdown => Dataset::VpnShutdown(Vec::new()),
        }
    }

    pub fn analysis(&self) -> AnalysisType {
        match self {
            Dataset::Vpn(_) => AnalysisType::Vpn,
            Dataset::Firewall(_) => AnalysisType::Firewall,
            Dataset::VpnShutdown(_) => AnalysisType::VpnShutdown,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.analysis().columns()
    }

    pub fn record_count(&self) -> usize {
        match self {
            Dataset::Vpn(rows) => rows.len(),
            Dataset::Firewall(rows) => rows.len(),
            Dataset::VpnShutdown(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Sum of the megabyte column, for analyses that have one
    pub fn total_sent_mb(&self) -> Option<f64> {
        match self {
            Dataset::Vpn(_) => None,
            Dataset::Firewall(rows) => Some(rows.iter().map(|r| r.size_mb).sum()),
            Dataset::VpnShutdown(rows) => Some(rows.iter().map(|r| r.sent_bytes_mb).sum()),
        }
    }

    /// First `limit` rows as JSON objects keyed by column name
    pub fn preview(&self, limit: usize) -> Result<Vec<serde_json::Value>, serde_json::Error> {
        fn take<T: Serialize>(rows: &[T], limit: usize) -> Result<Vec<serde_json::Value>, serde_json::Error> {
            rows.iter().take(limit).map(serde_json::to_value).collect()
        }

        match self {
            Dataset::Vpn(rows) => take(rows, limit),
            Dataset::Firewall(rows) => take(rows, limit),
            Dataset::VpnShutdown(rows) => take(rows, limit),
        }
    }

    /// Write the header row followed by one line per record
    ///
    /// The header is written even when there are no records.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(self.columns())?;

        match self {
            Dataset::Vpn(rows) => rows.iter().try_for_each(|r| wtr.serialize(r))?,
            Dataset::Firewall(rows) => rows.iter().try_for_each(|r| wtr.serialize(r))?,
            Dataset::VpnShutdown(rows) => rows.iter().try_for_each(|r| wtr.serialize(r))?,
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, csv::Error> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}
