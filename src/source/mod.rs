use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod innertube;

pub use innertube::InnertubeSource;

/// Errors raised by a caption service implementation.
///
/// These stay inside the pipeline; the selection layer maps them onto
/// [`crate::TranscriptError`] before anything reaches the user.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("service responded with HTTP {0}")]
    Status(u16),

    #[error("could not parse service response: {0}")]
    Parse(String),

    #[error("video is unavailable: {0}")]
    VideoUnavailable(String),

    #[error("captions are disabled for this video")]
    CaptionsDisabled,

    #[error("caption track '{0}' cannot be translated")]
    NotTranslatable(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => SourceError::Status(status.as_u16()),
            None => SourceError::RequestFailed(error.to_string()),
        }
    }
}

/// Whether a caption track was typed in by a human or produced by
/// speech recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Manual,
    Generated,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Manual => "manual",
            TrackKind::Generated => "auto-generated",
        }
    }
}

/// One subtitle track advertised for a video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Video the track belongs to
    pub video_id: String,

    /// BCP-47 style language code as reported by the service (e.g. "en", "es-419")
    pub language_code: String,

    /// Human-readable track name if the service provides one
    pub name: Option<String>,

    /// Manual or auto-generated
    pub kind: TrackKind,

    /// Whether the service can machine-translate this track
    pub is_translatable: bool,

    /// Timed-text URL handle used to fetch the track's segments
    pub base_url: String,
}

/// A timed unit of transcript text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Segment text
    pub text: String,
}

/// The set of caption tracks available for one video, in the order the
/// service listed them.
#[derive(Debug, Clone, Default)]
pub struct CaptionCatalog {
    pub video_id: String,

    /// Video title when the service reports it
    pub title: Option<String>,

    pub tracks: Vec<CaptionTrack>,
}

impl CaptionCatalog {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Language codes present in the catalog, in listing order
    pub fn available_languages(&self) -> Vec<String> {
        self.tracks
            .iter()
            .map(|track| track.language_code.clone())
            .collect()
    }

    /// Find the first track of the given kind matching an ordered language
    /// list. Each requested language is tried as an exact code match first,
    /// then by primary subtag so that "en" also matches "en-US".
    pub fn find(&self, kind: TrackKind, languages: &[String]) -> Option<&CaptionTrack> {
        for language in languages {
            let language = language.trim();
            if language.is_empty() {
                continue;
            }

            let exact = self
                .tracks
                .iter()
                .find(|t| t.kind == kind && t.language_code.eq_ignore_ascii_case(language));
            if exact.is_some() {
                return exact;
            }

            let by_subtag = self
                .tracks
                .iter()
                .find(|t| t.kind == kind && primary_subtag(&t.language_code).eq_ignore_ascii_case(language));
            if by_subtag.is_some() {
                return by_subtag;
            }
        }

        None
    }
}

fn primary_subtag(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Remote service that lists, fetches, and translates caption tracks.
///
/// Implemented for production by [`InnertubeSource`]; mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List every caption track published for a video
    async fn list_tracks(&self, video_id: &str) -> Result<CaptionCatalog, SourceError>;

    /// Fetch the timed text of one track
    async fn fetch_segments(&self, track: &CaptionTrack) -> Result<Vec<TranscriptSegment>, SourceError>;

    /// Request machine translation of a track, returning a handle fetchable
    /// with [`TranscriptSource::fetch_segments`]
    async fn translate(&self, track: &CaptionTrack, target: &str) -> Result<CaptionTrack, SourceError>;
}
