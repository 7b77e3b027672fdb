//! Unit tests for report renderers
//!
//! Tests text and JSON output against reports built by the analyzer

use seequell::{analyze, JsonRenderer, QueryRecord, Renderer, Report, RequestContext, TextRenderer};
use serde_json::Value;

/// Helper function to create the reference report
fn create_test_report() -> Report {
    let records = vec![
        QueryRecord::new("SELECT * FROM accounts WHERE owner_id = 1", 0.2),
        QueryRecord::new("select *\n  from accounts where owner_id = 1", 0.3),
        QueryRecord::new("SELECT * FROM orders WHERE status = 'open'", 2.5),
        QueryRecord::new("SELECT * FROM accounts WHERE owner_id = 2", 0.1),
    ];
    analyze(&records, 1.0, 3.2).unwrap()
}

fn create_test_request() -> RequestContext {
    RequestContext::new("POST", "/api/orders")
        .with_param("page", "2")
        .with_raw_body(br#"{"owner_id": 1}"#)
}

fn render_text(report: &Report, request: Option<&RequestContext>, summary_only: bool) -> String {
    let mut renderer = TextRenderer::new(Vec::new()).with_summary_only(summary_only);
    renderer.render(report, request).unwrap();
    String::from_utf8(renderer.into_inner()).unwrap()
}

fn render_json(report: &Report, request: Option<&RequestContext>) -> Value {
    let mut renderer = JsonRenderer::new(Vec::new());
    renderer.render(report, request).unwrap();
    serde_json::from_slice(&renderer.into_inner()).unwrap()
}

#[cfg(test)]
mod text_renderer_tests {
    use super::*;

    #[test]
    fn test_lists_every_query_with_time() {
        let output = render_text(&create_test_report(), None, false);

        assert!(output.contains("SELECT * FROM accounts WHERE owner_id = 1\n  ⤷ (0.200s)"));
        assert!(output.contains("select * from accounts where owner_id = 1\n  ⤷ (0.300s)"));
        assert!(output.contains("  ⤷ (2.500s)"));
    }

    #[test]
    fn test_duplicate_section() {
        let output = render_text(&create_test_report(), None, false);

        assert!(output.contains("Duplicate Queries Detected:"));
        assert!(output.contains("  ×2 → SELECT * FROM accounts WHERE owner_id = 1"));
    }

    #[test]
    fn test_similar_section() {
        let output = render_text(&create_test_report(), None, false);

        assert!(output.contains("Similar Queries (differing only in values):"));
        assert!(output.contains("  ×3 (2 variants) → SELECT * FROM accounts WHERE owner_id = ?"));
    }

    #[test]
    fn test_slow_section() {
        let output = render_text(&create_test_report(), None, false);

        let section = output
            .split("Slow Queries (>1.000s):\n")
            .nth(1)
            .expect("slow query section");
        assert!(section.starts_with("SELECT * FROM orders WHERE status = 'open'\n  ⤷ (2.500s)"));
    }

    #[test]
    fn test_metrics_table() {
        let output = render_text(&create_test_report(), None, false);

        assert!(output.contains("Metrics\n"));
        assert!(output.contains("Queries               4"));
        assert!(output.contains("SQL avg time          0.8000s"));
        assert!(output.contains("SQL mean time         0.7750s"));
        assert!(output.contains("SQL slowest time      2.5000s"));
        assert!(output.contains("SQL execution time    3.1000s"));
        assert!(output.contains("SQL share of request  96.9%"));
        assert!(output.contains("SQL duplicates        1"));
        assert!(output.contains("SQL slow queries      1"));
        assert!(!output.contains("Path"));
    }

    #[test]
    fn test_request_rows() {
        let request = create_test_request();
        let output = render_text(&create_test_report(), Some(&request), false);

        assert!(output.contains("Path                  /api/orders"));
        assert!(output.contains("Method                POST"));
        assert!(output.contains("Params                {"));
        assert!(output.contains("\"page\": \"2\""));
        assert!(output.contains("Body                  {"));
        assert!(output.contains("\"owner_id\": 1"));
    }

    #[test]
    fn test_request_rows_skip_missing_fields() {
        let request = RequestContext::new("GET", "/health");
        let output = render_text(&create_test_report(), Some(&request), false);

        assert!(output.contains("Path"));
        assert!(!output.contains("Params"));
        assert!(!output.contains("Body"));
        assert!(!output.contains("Captured"));
    }

    #[test]
    fn test_summary_only() {
        let output = render_text(&create_test_report(), None, true);

        assert!(output.starts_with("Metrics\n"));
        assert!(!output.contains("⤷"));
        assert!(!output.contains("Duplicate Queries Detected"));
    }

    #[test]
    fn test_no_sections_without_findings() {
        let report = analyze(&[QueryRecord::new("SELECT 1", 0.01)], 1.0, 0.02).unwrap();
        let output = render_text(&report, None, false);

        assert!(!output.contains("Duplicate Queries Detected"));
        assert!(!output.contains("Similar Queries"));
        assert!(!output.contains("Slow Queries"));
        assert!(output.contains("SQL duplicates"));
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        let report = analyze(&[], 1.0, 0.02).unwrap();
        let output = render_text(&report, Some(&create_test_request()), false);
        assert!(output.is_empty());
    }
}

#[cfg(test)]
mod json_renderer_tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let document = render_json(&create_test_report(), None);

        assert_eq!(document["metadata"]["tool"], "seequell");
        assert!(document["metadata"]["version"].is_string());
        assert!(document["metadata"]["generated_at"].is_string());
        assert!(document["request"].is_null());
        assert!(document["report"].is_object());
    }

    #[test]
    fn test_report_contents() {
        let document = render_json(&create_test_report(), Some(&create_test_request()));
        let report = &document["report"];

        assert_eq!(report["records"].as_array().unwrap().len(), 4);
        assert_eq!(report["duplicate_groups"][0]["count"], 2);
        assert_eq!(
            report["duplicate_groups"][0]["key"],
            "SELECT * FROM accounts WHERE owner_id = 1"
        );
        assert_eq!(report["slow_queries"][0]["elapsed"], 2.5);
        assert_eq!(report["threshold"], 1.0);
        assert_eq!(report["metrics"]["query_count"], 4);
        assert_eq!(report["metrics"]["slowest_time"], 2.5);
        assert_eq!(document["request"]["path"], "/api/orders");
        assert_eq!(document["request"]["body"]["owner_id"], 1);
    }

    #[test]
    fn test_absent_metrics_are_null() {
        let document = render_json(&analyze(&[], 1.0, 0.0).unwrap(), None);
        let metrics = &document["report"]["metrics"];

        assert!(metrics["slowest_time"].is_null());
        assert!(metrics["average_request_share"].is_null());
        assert!(metrics["sql_time_ratio"].is_null());
        assert_eq!(metrics["query_count"], 0);
    }

    #[test]
    fn test_compact_output_is_one_line() {
        let mut renderer = JsonRenderer::new(Vec::new()).with_pretty(false);
        renderer.render(&create_test_report(), None).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        assert_eq!(output.lines().count(), 1);
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_report_round_trips() {
        let report = create_test_report();
        let document = render_json(&report, None);
        let parsed: Report = serde_json::from_value(document["report"].clone()).unwrap();
        assert_eq!(parsed, report);
    }
}
