//! JSON report output

use chrono::Utc;
use serde_json::json;
use std::io::Write;

use super::Renderer;
use crate::{Report, RequestContext, Result};

/// JSON renderer writing one document per report
pub struct JsonRenderer<W: Write> {
    sink: W,
    pretty: bool,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, pretty: true }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, report: &Report, request: Option<&RequestContext>) -> Result<()> {
        let document = json!({
            "metadata": {
                "tool": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": Utc::now().to_rfc3339(),
            },
            "request": request,
            "report": report,
        });

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.sink, &document)?;
        } else {
            serde_json::to_writer(&mut self.sink, &document)?;
        }
        writeln!(self.sink)?;
        self.sink.flush()?;
        Ok(())
    }
}
