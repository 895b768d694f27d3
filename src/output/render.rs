// src/output/render.rs
//! Renders a page projection for the `read` command.

use crate::config::OutputFormat;
use crate::error::AppError;
use crate::reader::PageProjection;

/// Renders the projection in the requested format, newline-terminated.
///
/// Text output is the context string, then an `Images:` section with one URL
/// per line when the page has any.
pub fn render_projection(
    projection: &PageProjection,
    format: OutputFormat,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(projection)?)),
        OutputFormat::Text => Ok(render_text(projection)),
    }
}

fn render_text(projection: &PageProjection) -> String {
    let mut out = String::new();
    for fragment in &projection.text {
        out.push_str(fragment);
        out.push('\n');
    }
    if !projection.images.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("Images:\n");
        for url in &projection.images {
            out.push_str(url);
            out.push('\n');
        }
    }
    out
}
