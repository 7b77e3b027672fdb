use serde::{Deserialize, Serialize};

use super::record::QueryRecord;
use super::timing::Metrics;

/// Canonical statement executed more than once during the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub key: String,
    pub count: usize,
}

/// Statements that differ only in literal values, e.g. one lookup per row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarGroup {
    pub fingerprint: String,
    /// Executions across all matching statements
    pub count: usize,
    /// Number of distinct canonical statements sharing the fingerprint
    pub distinct_statements: usize,
}

/// Query slower than the configured threshold, with its original text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowQuery {
    pub sql: String,
    pub elapsed: f64,
}

impl From<&QueryRecord> for SlowQuery {
    fn from(record: &QueryRecord) -> Self {
        Self {
            sql: record.sql.clone(),
            elapsed: record.elapsed,
        }
    }
}

/// Result of analyzing one request's queries.
///
/// Built once by the analyzer and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    records: Vec<QueryRecord>,
    duplicate_groups: Vec<DuplicateGroup>,
    similar_groups: Vec<SimilarGroup>,
    slow_queries: Vec<SlowQuery>,
    threshold: f64,
    metrics: Metrics,
}

impl Report {
    pub(crate) fn new(
        records: Vec<QueryRecord>,
        duplicate_groups: Vec<DuplicateGroup>,
        similar_groups: Vec<SimilarGroup>,
        slow_queries: Vec<SlowQuery>,
        threshold: f64,
        metrics: Metrics,
    ) -> Self {
        Self {
            records,
            duplicate_groups,
            similar_groups,
            slow_queries,
            threshold,
            metrics,
        }
    }

    /// All records in execution order
    pub fn records(&self) -> &[QueryRecord] {
        &self.records
    }

    /// Duplicate groups in first-seen order
    pub fn duplicate_groups(&self) -> &[DuplicateGroup] {
        &self.duplicate_groups
    }

    pub fn similar_groups(&self) -> &[SimilarGroup] {
        &self.similar_groups
    }

    /// Slow queries in execution order
    pub fn slow_queries(&self) -> &[SlowQuery] {
        &self.slow_queries
    }

    /// Slow query threshold the report was built with, in seconds
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
