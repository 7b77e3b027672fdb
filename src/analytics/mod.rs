//! Per-request query analysis

pub mod queries;
pub mod record;
pub mod report;
pub mod timing;

pub use queries::{analyze, QueryAnalyzer};
pub use record::QueryRecord;
pub use report::{DuplicateGroup, Report, SimilarGroup, SlowQuery};
pub use timing::Metrics;
