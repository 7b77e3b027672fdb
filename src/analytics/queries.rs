//! Duplicate, similar and slow query detection for a single request

use std::collections::HashMap;

use super::record::QueryRecord;
use super::report::{DuplicateGroup, Report, SimilarGroup, SlowQuery};
use super::timing::compute_metrics;
use crate::config::AnalyzerConfig;
use crate::error::{invalid_input, invalid_record};
use crate::sql::{fingerprint, Canonicalize, SqlDialect};
use crate::{Result, SeequellError};

/// Analyzer for the queries executed during one request.
///
/// Holds configuration only; every call to [`QueryAnalyzer::analyze`] builds its
/// own state and returns a fresh [`Report`].
pub struct QueryAnalyzer {
    slow_query_threshold: f64,
    dialect: SqlDialect,
    canonicalizer: Box<dyn Canonicalize + Send + Sync>,
}

impl QueryAnalyzer {
    /// Create an analyzer with the default configuration
    pub fn new() -> Self {
        Self::with_config(&AnalyzerConfig::default())
    }

    pub fn with_config(config: &AnalyzerConfig) -> Self {
        Self {
            slow_query_threshold: config.slow_query_threshold,
            dialect: config.dialect,
            canonicalizer: config.canonicalizer.build(config.dialect),
        }
    }

    /// Use a caller-provided canonicalizer instead of the configured one
    pub fn with_canonicalizer<C>(config: &AnalyzerConfig, canonicalizer: C) -> Self
    where
        C: Canonicalize + Send + Sync + 'static,
    {
        Self {
            slow_query_threshold: config.slow_query_threshold,
            dialect: config.dialect,
            canonicalizer: Box::new(canonicalizer),
        }
    }

    pub fn slow_query_threshold(&self) -> f64 {
        self.slow_query_threshold
    }

    /// Analyze the queries of one request.
    ///
    /// `request_duration` is the wall-clock duration of the whole request in seconds.
    /// Fails on negative or non-finite times, blank SQL, or SQL the canonicalizer
    /// rejects; no partial report is ever returned.
    pub fn analyze(&self, records: &[QueryRecord], request_duration: f64) -> Result<Report> {
        let threshold = self.slow_query_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(invalid_input(format!(
                "slow query threshold must be a non-negative number of seconds, got {}",
                threshold
            )));
        }
        if !request_duration.is_finite() || request_duration < 0.0 {
            return Err(invalid_input(format!(
                "request duration must be a non-negative number of seconds, got {}",
                request_duration
            )));
        }

        let keys = self.canonical_keys(records)?;
        let key_counts = tally(keys.iter().map(String::as_str));

        let duplicate_groups: Vec<DuplicateGroup> = key_counts
            .iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, count)| DuplicateGroup {
                key: key.to_string(),
                count: *count,
            })
            .collect();
        let similar_groups = similar_groups(&key_counts, self.dialect);
        let slow_queries = self.find_slow_queries(records);

        let metrics = compute_metrics(
            records,
            request_duration,
            duplicate_groups.len(),
            slow_queries.len(),
        );

        Ok(Report::new(
            records.to_vec(),
            duplicate_groups,
            similar_groups,
            slow_queries,
            threshold,
            metrics,
        ))
    }

    /// Queries strictly slower than the threshold, in execution order
    pub fn find_slow_queries(&self, records: &[QueryRecord]) -> Vec<SlowQuery> {
        records
            .iter()
            .filter(|record| record.elapsed > self.slow_query_threshold)
            .map(SlowQuery::from)
            .collect()
    }

    /// Validate every record and compute its canonical key
    fn canonical_keys(&self, records: &[QueryRecord]) -> Result<Vec<String>> {
        let mut keys = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if record.sql.trim().is_empty() {
                return Err(invalid_record("SQL text is empty", index, &record.sql));
            }
            if !record.elapsed.is_finite() || record.elapsed < 0.0 {
                return Err(invalid_record(
                    format!(
                        "elapsed time must be a non-negative number of seconds, got {}",
                        record.elapsed
                    ),
                    index,
                    &record.sql,
                ));
            }

            let key = self
                .canonicalizer
                .canonicalize(&record.sql)
                .map_err(|e| match e {
                    SeequellError::InvalidInput { message, .. } => {
                        invalid_record(message, index, &record.sql)
                    }
                    other => other,
                })?;
            keys.push(key);
        }

        Ok(keys)
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueryAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryAnalyzer")
            .field("slow_query_threshold", &self.slow_query_threshold)
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

/// Analyze `records` with the default canonicalizer and the given threshold
pub fn analyze(records: &[QueryRecord], threshold: f64, request_duration: f64) -> Result<Report> {
    let config = AnalyzerConfig::default().with_threshold(threshold);
    QueryAnalyzer::with_config(&config).analyze(records, request_duration)
}

/// Count keys, keeping first-seen order
fn tally<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for key in keys {
        match index.get(key) {
            Some(&position) => counts[position].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts
}

/// Group distinct canonical keys by literal-free fingerprint. Only fingerprints
/// shared by two or more distinct statements are reported.
fn similar_groups(key_counts: &[(&str, usize)], dialect: SqlDialect) -> Vec<SimilarGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<SimilarGroup> = Vec::new();

    for (key, count) in key_counts {
        let Some(fingerprint) = fingerprint(key, dialect) else {
            continue;
        };
        match index.get(&fingerprint) {
            Some(&position) => {
                groups[position].count += count;
                groups[position].distinct_statements += 1;
            }
            None => {
                index.insert(fingerprint.clone(), groups.len());
                groups.push(SimilarGroup {
                    fingerprint,
                    count: *count,
                    distinct_statements: 1,
                });
            }
        }
    }

    groups.retain(|group| group.distinct_statements > 1);
    groups
}
