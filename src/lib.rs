pub mod config;
pub mod error;
pub mod models;
pub mod input;
pub mod extraction;
pub mod normalize;
pub mod aggregation;
pub mod analysis;
pub mod service;
pub mod output;

// Re-export commonly used types
pub use models::{AnalysisType, Dataset, FirewallEntry, LogRecord, ShutdownRecord};
pub use error::ParseError;
pub use input::{FormatDetector, SourceFormat};
pub use aggregation::{PublicIpClassifier, TrafficAggregator};
pub use service::LogParsingService;
pub use output::{JobSummary, ResultWriter};
