//! Raw-log field extraction
//!
//! Fortinet log lines carry `key=value` and `key="value"` tokens in no fixed
//! order. Each field is captured by its own small rule; an analysis combines
//! the rules it needs and keeps a line only when every one of them matched.

pub mod raw_log;
pub mod rules;

pub use raw_log::{RawLogExtractor, RawRows};
pub use rules::FieldRule;
