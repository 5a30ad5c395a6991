use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::source::{CaptionCatalog, InnertubeSource, TranscriptSegment, TranscriptSource};
use crate::{output, utils, TranscriptError};

pub mod selector;

/// Transcript fetched for one video, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResult {
    /// Canonical 11-character video identifier
    pub video_id: String,

    /// Video title when the caption service reports it
    pub title: Option<String>,

    /// Language the transcript is served in
    pub language: String,

    /// Language of the originally selected track when the transcript was
    /// machine-translated
    pub translated_from: Option<String>,

    /// Whether the selected track was auto-generated rather than
    /// human-authored
    pub is_generated: bool,

    /// Timed segments as fetched
    pub segments: Vec<TranscriptSegment>,

    /// Flattened, sanitized text stream handed to the renderer
    pub text: String,

    pub metadata: FetchMetadata,
}

/// Metadata about the lookup
#[derive(Debug, Clone, Serialize)]
pub struct FetchMetadata {
    pub segment_count: usize,

    /// Timestamp when the transcript was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl TranscriptResult {
    /// Heading rendered at the top of the document
    pub fn document_title(&self) -> String {
        format!(
            "Transcripción: {}",
            self.title.as_deref().unwrap_or(&self.video_id)
        )
    }
}

/// Main transcript pipeline: URL → identifier → track selection → normalized
/// text. One call per user action, nothing shared across requests.
pub struct TranscriptPipeline {
    config: Config,
    source: Box<dyn TranscriptSource>,
}

impl TranscriptPipeline {
    /// Create a pipeline backed by the production caption service
    pub fn new(config: Config) -> Self {
        Self::with_source(config, Box::new(InnertubeSource::new()))
    }

    /// Create a pipeline over any caption source, used by tests
    pub fn with_source(config: Config, source: Box<dyn TranscriptSource>) -> Self {
        Self { config, source }
    }

    /// Fetch the transcript for a user-supplied URL
    pub async fn fetch_from_url(&self, url: &str) -> Result<TranscriptResult, TranscriptError> {
        let video_id = utils::extract_video_id(url)
            .ok_or_else(|| TranscriptError::InvalidUrl(url.to_string()))?;

        self.fetch(video_id).await
    }

    /// Fetch the transcript for an already-extracted video identifier
    pub async fn fetch(&self, video_id: &str) -> Result<TranscriptResult, TranscriptError> {
        tracing::info!("Looking up captions for video: {}", video_id);

        let selection =
            selector::select_transcript(self.source.as_ref(), video_id, &self.config.languages)
                .await?;

        let text = output::normalize(&selection.segments);

        Ok(TranscriptResult {
            video_id: video_id.to_string(),
            title: selection.title,
            language: selection.track.language_code.clone(),
            translated_from: selection.source_language,
            is_generated: selection.track.kind == crate::source::TrackKind::Generated,
            metadata: FetchMetadata {
                segment_count: selection.segments.len(),
                retrieved_at: Utc::now(),
            },
            segments: selection.segments,
            text,
        })
    }

    /// List the caption tracks available for a user-supplied URL
    pub async fn list_tracks_from_url(&self, url: &str) -> Result<CaptionCatalog, TranscriptError> {
        let video_id = utils::extract_video_id(url)
            .ok_or_else(|| TranscriptError::InvalidUrl(url.to_string()))?;

        self.source
            .list_tracks(video_id)
            .await
            .map_err(|e| TranscriptError::CatalogUnavailable {
                video_id: video_id.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CaptionTrack, MockTranscriptSource, TrackKind};

    fn config() -> Config {
        Config::default()
    }

    #[tokio::test]
    async fn test_fetch_from_url_rejects_invalid_url() {
        let pipeline = TranscriptPipeline::with_source(config(), Box::new(MockTranscriptSource::new()));

        let result = pipeline.fetch_from_url("https://example.com/short").await;
        assert!(matches!(result, Err(TranscriptError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_from_url_produces_normalized_text() {
        let mut source = MockTranscriptSource::new();
        source.expect_list_tracks().returning(|video_id| {
            Ok(CaptionCatalog {
                video_id: video_id.to_string(),
                title: Some("Demo".to_string()),
                tracks: vec![CaptionTrack {
                    video_id: video_id.to_string(),
                    language_code: "es".to_string(),
                    name: None,
                    kind: TrackKind::Manual,
                    is_translatable: true,
                    base_url: "https://timedtext.example/es".to_string(),
                }],
            })
        });
        source.expect_fetch_segments().returning(|_| {
            Ok(vec![
                TranscriptSegment {
                    start: 0.0,
                    duration: 1.0,
                    text: "Hola".to_string(),
                },
                TranscriptSegment {
                    start: 1.0,
                    duration: 1.0,
                    text: "mundo \u{1F600}".to_string(),
                },
            ])
        });

        let pipeline = TranscriptPipeline::with_source(config(), Box::new(source));
        let result = pipeline
            .fetch_from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(result.video_id, "dQw4w9WgXcQ");
        assert_eq!(result.text, "Hola mundo ?");
        assert_eq!(result.metadata.segment_count, 2);
        assert_eq!(result.document_title(), "Transcripción: Demo");
    }
}
