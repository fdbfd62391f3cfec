pub mod csv_table;
pub mod format_detector;

pub use csv_table::CsvTable;
pub use format_detector::{FormatDetector, SourceFormat};
