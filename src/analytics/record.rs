use serde::{Deserialize, Deserializer, Serialize};

/// One executed statement as reported by the query collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Raw statement text, exactly as executed
    pub sql: String,
    /// Execution time in seconds. Collectors that report `"time": "0.002"` are accepted.
    #[serde(alias = "time", deserialize_with = "deserialize_seconds")]
    pub elapsed: f64,
}

impl QueryRecord {
    pub fn new(sql: impl Into<String>, elapsed: f64) -> Self {
        Self {
            sql: sql.into(),
            elapsed,
        }
    }
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(f64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Number(value) => Ok(value),
        Seconds::Text(text) => text.trim().parse::<f64>().map_err(|e| {
            serde::de::Error::custom(format!("invalid elapsed time {:?}: {}", text, e))
        }),
    }
}
