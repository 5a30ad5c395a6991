use crate::source::TranscriptSegment;

/// Replacement for characters the PDF encoding cannot represent
pub const PLACEHOLDER: char = '?';

/// Flatten timed segments into one plain-text stream.
///
/// Segment texts are joined with a single space, whitespace runs (including
/// line breaks inside a caption cue) are collapsed, HTML entities left over
/// from the caption format are decoded, and every character outside Latin-1
/// becomes [`PLACEHOLDER`]. The replacement is lossy; emoji and non-Latin
/// scripts do not survive, which is the price of handing the renderer text
/// it can always encode.
///
/// Pure function: no failure conditions, empty input yields an empty string.
pub fn normalize(segments: &[TranscriptSegment]) -> String {
    let joined = segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<&str>>()
        .join(" ");

    let decoded = html_escape::decode_html_entities(&joined);

    let flattened = decoded
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");

    flattened
        .chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { PLACEHOLDER })
        .collect()
}
