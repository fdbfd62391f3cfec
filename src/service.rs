//! Log parsing service
//!
//! Entry point for callers: given a file path and an analysis type, detect
//! the source format, extract or normalize rows, run the shared analysis
//! steps and hand back a fresh `Dataset`. Each call is a single sequential
//! pass over one file and shares no state with any other call.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::analysis::{aggregate_traffic, collect_logins, collect_shutdowns, NormalizedRow, SuccessMatch};
use crate::error::ParseError;
use crate::extraction::RawLogExtractor;
use crate::input::{CsvTable, FormatDetector, SourceFormat};
use crate::models::{AnalysisType, Dataset};
use crate::normalize::{csv_rows, ColumnNormalizer};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogParsingService;

impl LogParsingService {
    pub fn new() -> Self {
        LogParsingService
    }

    /// Parse `path` for `analysis`
    ///
    /// `user_filter` is required (non-blank) for `vpn_shutdown` and ignored
    /// otherwise. A zero-row dataset is a successful result.
    pub fn parse<P: AsRef<Path>>(
        &self,
        path: P,
        analysis: AnalysisType,
        user_filter: Option<&str>,
    ) -> Result<Dataset, ParseError> {
        let path = path.as_ref();
        let target_user = Self::target_user(analysis, user_filter)?;

        let format = FormatDetector::detect(path);
        log::info!("Parsing {} as {} ({:?})", path.display(), analysis, format);

        let dataset = match format {
            SourceFormat::Csv => self.parse_csv(path, analysis, target_user)?,
            SourceFormat::RawLog => self.parse_raw(path, analysis, target_user)?,
            SourceFormat::Unknown => {
                log::warn!(
                    "Could not detect format of {}, falling back to raw log parsing",
                    path.display()
                );
                self.parse_raw(path, analysis, target_user)?
            }
        };

        log::info!(
            "Parsed {} record(s) from {} for {}",
            dataset.record_count(),
            path.display(),
            analysis
        );
        Ok(dataset)
    }

    /// Run `parse` on tokio's blocking pool
    ///
    /// Lets many files be parsed as independent tasks. The parse itself is
    /// not cancellable; dropping the future only discards its result.
    pub async fn parse_async(
        &self,
        path: PathBuf,
        analysis: AnalysisType,
        user_filter: Option<String>,
    ) -> Result<Dataset, ParseError> {
        let service = *self;
        tokio::task::spawn_blocking(move || service.parse(&path, analysis, user_filter.as_deref()))
            .await
            .map_err(|e| ParseError::Task(e.to_string()))?
    }

    fn target_user(analysis: AnalysisType, user_filter: Option<&str>) -> Result<&str, ParseError> {
        if !analysis.requires_user() {
            return Ok("");
        }
        match user_filter.map(str::trim) {
            Some(user) if !user.is_empty() => Ok(user),
            _ => Err(ParseError::MissingUserFilter),
        }
    }

    fn parse_raw(
        &self,
        path: &Path,
        analysis: AnalysisType,
        target_user: &str,
    ) -> Result<Dataset, ParseError> {
        let file = File::open(path).map_err(|e| ParseError::unreadable(path, e))?;
        let reader = BufReader::new(file);

        let (dataset, scanned) = match analysis {
            AnalysisType::Vpn => {
                let mut rows = RawLogExtractor::rows(reader, RawLogExtractor::login_row);
                let records = collect_logins(&mut rows, SuccessMatch::Exact);
                (Dataset::Vpn(records), rows.finish())
            }
            AnalysisType::Firewall => {
                let mut rows = RawLogExtractor::rows(reader, RawLogExtractor::traffic_row);
                let entries = aggregate_traffic(&mut rows);
                (Dataset::Firewall(entries), rows.finish())
            }
            AnalysisType::VpnShutdown => {
                let mut rows = RawLogExtractor::rows(reader, |line: &str| {
                    RawLogExtractor::shutdown_row(line, target_user)
                });
                let records = collect_shutdowns(&mut rows);
                (Dataset::VpnShutdown(records), rows.finish())
            }
        };

        let scanned = scanned.map_err(|e| ParseError::unreadable(path, e))?;
        log::debug!("Scanned {} line(s) from {}", scanned, path.display());
        Ok(dataset)
    }

    fn parse_csv(
        &self,
        path: &Path,
        analysis: AnalysisType,
        target_user: &str,
    ) -> Result<Dataset, ParseError> {
        let table = CsvTable::load(path)?;
        let table = ColumnNormalizer::for_analysis(analysis).normalize(table)?;
        log::debug!("Loaded {} CSV row(s) from {}", table.len(), path.display());

        let dataset = match analysis {
            AnalysisType::Vpn => {
                let rows: Vec<NormalizedRow> = csv_rows::vpn_rows(&table);
                Dataset::Vpn(collect_logins(rows, SuccessMatch::Contains))
            }
            AnalysisType::Firewall => {
                Dataset::Firewall(aggregate_traffic(csv_rows::traffic_rows(&table)))
            }
            AnalysisType::VpnShutdown => Dataset::VpnShutdown(collect_shutdowns(
                csv_rows::shutdown_rows(&table, target_user),
            )),
        };
        Ok(dataset)
    }
}
