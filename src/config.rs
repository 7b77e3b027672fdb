//! Analyzer configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::config_error;
use crate::sql::{AstCanonicalizer, Canonicalize, SqlDialect, TokenCanonicalizer};
use crate::Result;

/// Default slow query threshold in seconds
pub const DEFAULT_SLOW_QUERY_THRESHOLD: f64 = 1.0;

/// Which canonicalizer computes duplicate keys
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalizerKind {
    /// Parse and re-print the statement; fails on SQL the parser rejects
    #[default]
    Ast,
    /// Token-level normalization; accepts any tokenizable text
    Tokens,
}

impl CanonicalizerKind {
    pub fn build(self, dialect: SqlDialect) -> Box<dyn Canonicalize + Send + Sync> {
        match self {
            CanonicalizerKind::Ast => Box::new(AstCanonicalizer::new(dialect)),
            CanonicalizerKind::Tokens => Box::new(TokenCanonicalizer::new(dialect)),
        }
    }
}

/// Settings for [`crate::QueryAnalyzer`]. Every field is optional in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Queries strictly slower than this many seconds are reported as slow
    pub slow_query_threshold: f64,
    pub canonicalizer: CanonicalizerKind,
    pub dialect: SqlDialect,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            slow_query_threshold: DEFAULT_SLOW_QUERY_THRESHOLD,
            canonicalizer: CanonicalizerKind::default(),
            dialect: SqlDialect::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load a JSON config file and validate it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AnalyzerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_threshold(mut self, seconds: f64) -> Self {
        self.slow_query_threshold = seconds;
        self
    }

    pub fn with_canonicalizer(mut self, kind: CanonicalizerKind) -> Self {
        self.canonicalizer = kind;
        self
    }

    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.slow_query_threshold.is_finite() || self.slow_query_threshold < 0.0 {
            return Err(config_error(
                format!(
                    "slow query threshold must be a non-negative number of seconds, got {}",
                    self.slow_query_threshold
                ),
                Some("slow_query_threshold"),
            ));
        }
        Ok(())
    }
}
