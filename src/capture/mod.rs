//! Loading query captures written by a request collector

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::analytics::QueryRecord;
use crate::error::config_error;
use crate::request::RequestContext;
use crate::{Result, SeequellError};

/// Queries captured during one request, plus what is known about the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCapture {
    #[serde(default)]
    pub request: Option<RequestContext>,
    /// Wall-clock duration of the whole request, in seconds
    pub duration: f64,
    pub queries: Vec<QueryRecord>,
}

/// Parse a capture from JSON text.
///
/// A JSON object is a full capture. A bare array of queries carries no request
/// duration, so `fallback_duration` must be provided for it; it is ignored for full
/// captures.
pub fn from_str(text: &str, fallback_duration: Option<f64>) -> Result<RequestCapture> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(fields) => Ok(serde_json::from_value(Value::Object(fields))?),
        // bare `connection.queries`-style dump with no request information
        Value::Array(items) => {
            let queries: Vec<QueryRecord> = serde_json::from_value(Value::Array(items))?;
            let duration = fallback_duration.ok_or_else(|| {
                config_error(
                    "capture is a bare query list; a request duration must be supplied",
                    Some("request_duration"),
                )
            })?;
            debug!("Bare query list with {} entries", queries.len());
            Ok(RequestCapture {
                request: None,
                duration,
                queries,
            })
        }
        _ => Err(SeequellError::Serialization(serde::de::Error::custom(
            "capture must be a JSON object or an array of queries",
        ))),
    }
}

/// Read and parse a capture file
pub fn load(path: impl AsRef<Path>, fallback_duration: Option<f64>) -> Result<RequestCapture> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let capture = from_str(&content, fallback_duration)?;
    info!(
        "Loaded {} queries from {}",
        capture.queries.len(),
        path.display()
    );
    Ok(capture)
}
