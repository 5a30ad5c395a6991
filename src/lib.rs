//! Transcripdf - A Rust CLI tool for saving YouTube transcripts as PDF documents
//!
//! This library fetches the caption tracks published for a YouTube video,
//! picks the best available one (manual captions outrank auto-generated ones),
//! optionally asks YouTube to translate it, and renders the flattened text
//! into a downloadable PDF.

pub mod cli;
pub mod config;
pub mod output;
pub mod source;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use source::{CaptionCatalog, CaptionTrack, TranscriptSegment, TranscriptSource};
pub use transcript::{TranscriptPipeline, TranscriptResult};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Failures surfaced to the user, one kind per way a transcript lookup can go wrong.
///
/// Raw transport errors from the caption service never leave the pipeline;
/// they are mapped to one of these kinds at the selection boundary.
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Not a valid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Could not list captions for video {video_id}: {reason}")]
    CatalogUnavailable { video_id: String, reason: String },

    #[error("No caption track matches any requested language (available: {})", format_available(.available))]
    NoTranscriptAvailable { available: Vec<String> },

    #[error("Translation to '{target}' failed: {reason}")]
    TranslationFailed { target: String, reason: String },

    #[error("Could not fetch transcript text: {0}")]
    FetchFailed(String),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

impl TranscriptError {
    /// Likely causes shown alongside the error message, so users get
    /// actionable guidance instead of a raw transport error.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            TranscriptError::InvalidUrl(_) => &[
                "Expected something like https://www.youtube.com/watch?v=dQw4w9WgXcQ or https://youtu.be/dQw4w9WgXcQ",
            ],
            TranscriptError::CatalogUnavailable { .. } => &[
                "The video may be private, age-restricted, or very new",
                "The uploader may have disabled captions",
                "YouTube may have temporarily blocked this connection (wait a while and retry)",
            ],
            TranscriptError::NoTranscriptAvailable { .. } => &[
                "Pass the video's own language with --language",
                "Run the `tracks` command to see which captions exist",
            ],
            TranscriptError::TranslationFailed { .. } => &[
                "Not every caption track can be machine-translated",
                "Use --no-translate to keep the transcript in its original language",
            ],
            TranscriptError::FetchFailed(_) => &[
                "Check your network connection",
                "YouTube may have temporarily blocked this connection (wait a while and retry)",
            ],
        }
    }
}
