//! Renderers that turn a [`Report`] into something a person or tool can read

pub mod json;
pub mod text;

pub use json::JsonRenderer;
pub use text::TextRenderer;

use crate::{Report, RequestContext, Result};

/// Writes a report to the sink the renderer owns
pub trait Renderer {
    fn render(&mut self, report: &Report, request: Option<&RequestContext>) -> Result<()>;
}
