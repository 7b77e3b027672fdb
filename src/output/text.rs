//! Human-readable report output

use std::io::Write;

use super::Renderer;
use crate::{Report, RequestContext, Result};

/// Text renderer writing to any [`Write`] sink.
///
/// Nothing is written for a report without queries.
pub struct TextRenderer<W: Write> {
    sink: W,
    summary_only: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            summary_only: false,
        }
    }

    /// Only print the metrics table
    pub fn with_summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_queries(&mut self, report: &Report) -> Result<()> {
        for record in report.records() {
            writeln!(self.sink, "{}", single_line(&record.sql))?;
            writeln!(self.sink, "  ⤷ ({:.3}s)", record.elapsed)?;
        }

        if !report.duplicate_groups().is_empty() {
            writeln!(self.sink)?;
            writeln!(self.sink, "Duplicate Queries Detected:")?;
            for group in report.duplicate_groups() {
                writeln!(self.sink, "  ×{} → {}", group.count, group.key)?;
            }
        }

        if !report.similar_groups().is_empty() {
            writeln!(self.sink)?;
            writeln!(self.sink, "Similar Queries (differing only in values):")?;
            for group in report.similar_groups() {
                writeln!(
                    self.sink,
                    "  ×{} ({} variants) → {}",
                    group.count, group.distinct_statements, group.fingerprint
                )?;
            }
        }

        if !report.slow_queries().is_empty() {
            writeln!(self.sink)?;
            writeln!(self.sink, "Slow Queries (>{:.3}s):", report.threshold())?;
            for query in report.slow_queries() {
                writeln!(self.sink, "{}", single_line(&query.sql))?;
                writeln!(self.sink, "  ⤷ ({:.3}s)", query.elapsed)?;
            }
        }

        writeln!(self.sink)?;
        Ok(())
    }

    fn write_metrics(&mut self, report: &Report, request: Option<&RequestContext>) -> Result<()> {
        let metrics = report.metrics();
        let mut rows: Vec<(&str, String)> = Vec::new();

        if let Some(request) = request {
            rows.push(("Path", request.path.clone()));
            rows.push(("Method", request.method.clone()));
            if !request.params.is_empty() {
                rows.push(("Params", serde_json::to_string_pretty(&request.params)?));
            }
            if let Some(body) = &request.body {
                rows.push(("Body", serde_json::to_string_pretty(body)?));
            }
            if let Some(captured_at) = request.captured_at {
                rows.push((
                    "Captured",
                    captured_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                ));
            }
        }

        rows.push(("Queries", metrics.query_count.to_string()));
        rows.push(("SQL avg time", seconds(metrics.average_request_share)));
        rows.push(("SQL mean time", seconds(metrics.mean_sql_time)));
        rows.push(("SQL slowest time", seconds(metrics.slowest_time)));
        rows.push(("SQL execution time", seconds(Some(metrics.total_sql_time))));
        rows.push((
            "SQL share of request",
            metrics
                .sql_time_ratio
                .map(|ratio| format!("{:.1}%", ratio * 100.0))
                .unwrap_or_else(|| "n/a".to_string()),
        ));
        rows.push(("SQL duplicates", metrics.duplicate_group_count.to_string()));
        rows.push(("SQL slow queries", metrics.slow_query_count.to_string()));

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        writeln!(self.sink, "Metrics")?;
        for (label, value) in rows {
            let mut lines = value.lines();
            let first = lines.next().unwrap_or("");
            writeln!(self.sink, "  {:<width$}  {}", label, first, width = width)?;
            for line in lines {
                writeln!(self.sink, "  {:<width$}  {}", "", line, width = width)?;
            }
        }
        writeln!(self.sink)?;

        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, report: &Report, request: Option<&RequestContext>) -> Result<()> {
        if report.is_empty() {
            return Ok(());
        }

        if !self.summary_only {
            self.write_queries(report)?;
        }
        self.write_metrics(report, request)?;
        self.sink.flush()?;
        Ok(())
    }
}

fn single_line(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn seconds(value: Option<f64>) -> String {
    value
        .map(|secs| format!("{:.4}s", secs))
        .unwrap_or_else(|| "n/a".to_string())
}
