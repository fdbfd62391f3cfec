pub mod aggregator;
pub mod public_ip;

pub use aggregator::TrafficAggregator;
pub use public_ip::PublicIpClassifier;
