//! CSV schema normalization
//!
//! Exports of the same Fortinet data arrive with differing column names.
//! `ColumnNormalizer` maps known synonyms onto the canonical names each
//! analysis requires; `csv_rows` then lifts the table into `NormalizedRow`s.

pub mod column_normalizer;
pub mod csv_rows;

pub use column_normalizer::{is_known_column, ColumnNormalizer, SYNONYMS};
