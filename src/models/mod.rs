pub mod analysis_type;
pub mod dataset;
pub mod record;

pub use analysis_type::AnalysisType;
pub use dataset::Dataset;
pub use record::{bytes_to_mb, FirewallEntry, LogRecord, ShutdownRecord, BYTES_PER_MB};
