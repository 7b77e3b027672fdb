//! seequell - per-request SQL query report
//!
//! Takes the queries executed while serving one request and reports duplicated
//! statements, slow statements and how much of the request was spent in SQL.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod analytics;
pub mod capture;
pub mod config;
pub mod error;
pub mod output;
pub mod request;
pub mod sql;

// Re-export commonly used items
pub use analytics::{
    analyze, DuplicateGroup, Metrics, QueryAnalyzer, QueryRecord, Report, SimilarGroup, SlowQuery,
};
pub use capture::RequestCapture;
pub use config::{AnalyzerConfig, CanonicalizerKind, DEFAULT_SLOW_QUERY_THRESHOLD};
pub use error::{Result, SeequellError};
pub use output::{JsonRenderer, Renderer, TextRenderer};
pub use request::RequestContext;
pub use sql::{AstCanonicalizer, Canonicalize, SqlDialect, TokenCanonicalizer};
