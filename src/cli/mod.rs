use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcripdf",
    about = "Download YouTube transcripts as PDF documents, translated if you want",
    version,
    long_about = "Fetches the caption tracks published for a YouTube video, picks the best one (manual captions win over auto-generated ones), optionally asks YouTube to translate it, and saves the text as a PDF."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a video's transcript
    Fetch {
        /// YouTube video URL (watch, share, embed, or shorts form)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (defaults to transcripcion_<videoId>.pdf for PDF,
        /// console otherwise)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: OutputFormat,

        /// Preferred caption language, repeatable in priority order
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Fallback language for auto-generated captions, repeatable in
        /// priority order
        #[arg(long = "fallback-language", value_name = "LANG")]
        fallback_languages: Vec<String>,

        /// Translate the transcript to this language
        #[arg(short, long, value_name = "LANG", conflicts_with = "no_translate")]
        translate_to: Option<String>,

        /// Keep the transcript in whatever language it was found in
        #[arg(long)]
        no_translate: bool,
    },

    /// List the caption tracks available for a video
    Tracks {
        /// YouTube video URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show or edit the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// PDF document
    Pdf,
    /// Plain text
    Text,
    /// JSON with timestamps
    Json,
}

impl OutputFormat {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pdf => write!(f, "pdf"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
