use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcript::TranscriptResult;

pub mod normalize;
pub mod pdf;

pub use normalize::normalize;
pub use pdf::PdfRenderer;

/// Boundary that turns a title and a normalized text body into the bytes of
/// a downloadable document. The caller is responsible for handing it text
/// already sanitized to the renderer's supported character range.
pub trait DocumentRenderer {
    fn render(&self, title: &str, body: &str) -> Result<Vec<u8>>;
}

/// Render a transcript result into the bytes for the requested format
pub fn render_document(result: &TranscriptResult, format: &OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Pdf => PdfRenderer::default().render(&result.document_title(), &result.text),
        OutputFormat::Text => Ok(format_as_text(result).into_bytes()),
        OutputFormat::Json => Ok(serde_json::to_vec_pretty(result)?),
    }
}

/// Save a transcript result to a file
pub async fn save_to_file(result: &TranscriptResult, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render_document(result, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print a transcript result to the console
pub fn print_to_console(result: &TranscriptResult, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Pdf => anyhow::bail!("PDF output is binary; pass --output to write it to a file"),
        OutputFormat::Text => println!("{}", format_as_text(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}

fn format_as_text(result: &TranscriptResult) -> String {
    format!("{}\n\n{}", result.document_title(), result.text)
}
