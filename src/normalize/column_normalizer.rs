use crate::error::ParseError;
use crate::input::CsvTable;
use crate::models::AnalysisType;

/// Alternate column names and the canonical column each one stands for
///
/// When a canonical column is missing, the first synonym present in the
/// table (in this order) is renamed to it.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("username", "user"),
    ("login_time", "time"),
    ("login_date", "date"),
    ("status", "reason"),
    ("result", "reason"),
    ("destination_ip", "dstip"),
    ("dest_ip", "dstip"),
    ("dst_ip", "dstip"),
    ("sent_bytes", "sentbyte"),
    ("bytes_sent", "sentbyte"),
    ("sentbytes", "sentbyte"),
];

const CANONICAL_COLUMNS: &[&str] = &[
    "date", "time", "user", "tunneltype", "remip", "reason", "msg", "dstip", "sentbyte",
];

/// Whether `name` is a canonical column or one of its synonyms
pub fn is_known_column(name: &str) -> bool {
    CANONICAL_COLUMNS.contains(&name) || SYNONYMS.iter().any(|(syn, _)| *syn == name)
}

/// Brings a CSV table's header in line with the columns an analysis needs
#[derive(Debug, Clone)]
pub struct ColumnNormalizer {
    required: &'static [&'static str],
    synonyms: &'static [(&'static str, &'static str)],
}

impl ColumnNormalizer {
    pub fn new(
        required: &'static [&'static str],
        synonyms: &'static [(&'static str, &'static str)],
    ) -> Self {
        ColumnNormalizer { required, synonyms }
    }

    /// Required columns and the shared synonym map for `analysis`
    pub fn for_analysis(analysis: AnalysisType) -> Self {
        let required: &'static [&'static str] = match analysis {
            AnalysisType::Vpn => &["date", "time", "user", "reason"],
            AnalysisType::Firewall => &["dstip", "sentbyte"],
            AnalysisType::VpnShutdown => &["date", "time", "user", "sentbyte"],
        };
        ColumnNormalizer::new(required, SYNONYMS)
    }

    /// Resolve synonyms for missing required columns
    ///
    /// Fails with `ParseError::FormatError` naming every required column
    /// that is still absent afterwards.
    pub fn normalize(&self, mut table: CsvTable) -> Result<CsvTable, ParseError> {
        for &column in self.required {
            if table.has_column(column) {
                continue;
            }

            let renamed = self
                .synonyms
                .iter()
                .filter(|(_, canonical)| *canonical == column)
                .find(|(synonym, _)| table.rename_column(synonym, column));

            if let Some((synonym, _)) = renamed {
                log::debug!("Mapped CSV column '{}' to '{}'", synonym, column);
            }
        }

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|c| !table.has_column(c))
            .map(|c| c.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ParseError::FormatError { missing });
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &str) -> CsvTable {
        CsvTable::from_reader(format!("{}\n", header).as_bytes()).unwrap()
    }

    #[test]
    fn test_firewall_synonyms_resolve() {
        let normalizer = ColumnNormalizer::for_analysis(AnalysisType::Firewall);
        let table = normalizer.normalize(table("username,bytes_sent,dstip")).unwrap();

        assert!(table.has_column("sentbyte"));
        assert!(table.has_column("dstip"));
        assert!(!table.has_column("bytes_sent"));
    }

    #[test]
    fn test_first_synonym_wins() {
        let normalizer = ColumnNormalizer::for_analysis(AnalysisType::Firewall);
        let table = normalizer.normalize(table("dst_ip,dest_ip,sentbyte")).unwrap();

        assert_eq!(table.headers(), &["dst_ip", "dstip", "sentbyte"]);
    }

    #[test]
    fn test_vpn_synonyms_resolve() {
        let normalizer = ColumnNormalizer::for_analysis(AnalysisType::Vpn);
        let table = normalizer
            .normalize(table("Login_Date,login_time,UserName,status"))
            .unwrap();

        assert_eq!(table.headers(), &["date", "time", "user", "reason"]);
    }

    #[test]
    fn test_existing_column_is_not_replaced() {
        let normalizer = ColumnNormalizer::for_analysis(AnalysisType::VpnShutdown);
        let table = normalizer
            .normalize(table("date,time,user,username,sentbyte"))
            .unwrap();

        assert_eq!(table.headers(), &["date", "time", "user", "username", "sentbyte"]);
    }

    #[test]
    fn test_missing_user_is_format_error() {
        let normalizer = ColumnNormalizer::for_analysis(AnalysisType::VpnShutdown);
        let err = normalizer.normalize(table("date,time,login,sent_bytes")).unwrap_err();

        match err {
            ParseError::FormatError { missing } => assert_eq!(missing, vec!["user"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_columns_are_reported() {
        let normalizer = ColumnNormalizer::for_analysis(AnalysisType::Vpn);
        let err = normalizer.normalize(table("srcip,dstport")).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Required columns date, time, user, reason not found in CSV"
        );
    }

    #[test]
    fn test_is_known_column() {
        assert!(is_known_column("sentbyte"));
        assert!(is_known_column("bytes_sent"));
        assert!(is_known_column("msg"));
        assert!(!is_known_column("srcport"));
    }
}
