use once_cell::sync::Lazy;
use regex::Regex;

use crate::cli::OutputFormat;

// An 11-character video token following a "v=" query marker or a path
// separator. Covers watch, share (youtu.be), embed, and shorts URLs.
static VIDEO_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

/// Extract the canonical 11-character video identifier from a user-supplied
/// URL, or `None` when the string contains no such token. `None` is the
/// expected invalid-input outcome, not a fault.
///
/// When a string contains several candidate tokens the first textual
/// occurrence wins; that mirrors what users paste in practice but is not a
/// guarantee worth relying on.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Default artifact name for a downloaded transcript,
/// e.g. `transcripcion_dQw4w9WgXcQ.pdf`
pub fn default_artifact_name(video_id: &str, format: &OutputFormat) -> String {
    format!("transcripcion_{}.{}", video_id, format.extension())
}
