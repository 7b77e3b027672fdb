//! Aggregate timing metrics for one request

use serde::{Deserialize, Serialize};

use super::record::QueryRecord;

/// Timing summary of one request's queries. Values that need at least one query
/// (or a non-zero request duration) are `None` rather than NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub query_count: usize,
    /// Sum of all query times, in seconds
    pub total_sql_time: f64,
    pub slowest_time: Option<f64>,
    /// Whole request duration divided by the number of queries
    pub average_request_share: Option<f64>,
    /// Mean query execution time
    pub mean_sql_time: Option<f64>,
    /// Fraction of the request spent executing SQL
    pub sql_time_ratio: Option<f64>,
    pub request_duration: f64,
    pub duplicate_group_count: usize,
    pub slow_query_count: usize,
}

pub(crate) fn compute_metrics(
    records: &[QueryRecord],
    request_duration: f64,
    duplicate_group_count: usize,
    slow_query_count: usize,
) -> Metrics {
    let query_count = records.len();
    let total_sql_time: f64 = records.iter().map(|record| record.elapsed).sum();
    let slowest_time = records
        .iter()
        .map(|record| record.elapsed)
        .fold(None, |slowest: Option<f64>, elapsed| {
            Some(slowest.map_or(elapsed, |current| current.max(elapsed)))
        });

    let (average_request_share, mean_sql_time) = if query_count > 0 {
        (
            Some(request_duration / query_count as f64),
            Some(total_sql_time / query_count as f64),
        )
    } else {
        (None, None)
    };

    let sql_time_ratio = if request_duration > 0.0 {
        Some(total_sql_time / request_duration)
    } else {
        None
    };

    Metrics {
        query_count,
        total_sql_time,
        slowest_time,
        average_request_share,
        mean_sql_time,
        sql_time_ratio,
        request_duration,
        duplicate_group_count,
        slow_query_count,
    }
}
