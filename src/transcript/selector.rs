use crate::config::LanguagePolicy;
use crate::source::{CaptionTrack, TrackKind, TranscriptSegment, TranscriptSource};
use crate::TranscriptError;

/// Outcome of a successful track selection
#[derive(Debug, Clone)]
pub struct Selection {
    /// The track the segments were served from (the translated handle when
    /// translation was requested)
    pub track: CaptionTrack,

    /// Language of the originally selected track when it was translated
    pub source_language: Option<String>,

    /// Video title as reported by the catalog
    pub title: Option<String>,

    pub segments: Vec<TranscriptSegment>,
}

/// Choose exactly one caption track and obtain its segments in the desired
/// output language.
///
/// The fallback chain is a plain sequence of lookups, not a retry loop:
///
/// 1. List the catalog; a listing failure is `CatalogUnavailable`.
/// 2. First manually-authored track matching `policy.preferred`, in order.
/// 3. Otherwise, first auto-generated track matching `policy.fallback`.
/// 4. Neither found: `NoTranscriptAvailable`.
/// 5. When `policy.target` names a different language than the selected
///    track, request translation; a failure here is `TranslationFailed` and
///    the untranslated track is never served in its place.
/// 6. Fetch the chosen track's segments; transport errors are `FetchFailed`.
///
/// No retries anywhere: a single remote outage surfaces immediately as its
/// typed kind.
pub async fn select_transcript(
    source: &dyn TranscriptSource,
    video_id: &str,
    policy: &LanguagePolicy,
) -> Result<Selection, TranscriptError> {
    let catalog = source
        .list_tracks(video_id)
        .await
        .map_err(|e| TranscriptError::CatalogUnavailable {
            video_id: video_id.to_string(),
            reason: e.to_string(),
        })?;

    let chosen = catalog
        .find(TrackKind::Manual, &policy.preferred)
        .or_else(|| catalog.find(TrackKind::Generated, &policy.fallback))
        .ok_or_else(|| TranscriptError::NoTranscriptAvailable {
            available: catalog.available_languages(),
        })?;

    tracing::info!(
        "Selected {} '{}' track for video {}",
        chosen.kind.as_str(),
        chosen.language_code,
        video_id
    );

    let mut source_language = None;
    let track = match &policy.target {
        Some(target) if !serves_language(&chosen.language_code, target) => {
            let translated = source
                .translate(chosen, target)
                .await
                .map_err(|e| TranscriptError::TranslationFailed {
                    target: target.clone(),
                    reason: e.to_string(),
                })?;
            tracing::info!("Requested '{}' translation of '{}'", target, chosen.language_code);
            source_language = Some(chosen.language_code.clone());
            translated
        }
        _ => chosen.clone(),
    };

    let segments = source
        .fetch_segments(&track)
        .await
        .map_err(|e| TranscriptError::FetchFailed(e.to_string()))?;

    Ok(Selection {
        track,
        source_language,
        title: catalog.title.clone(),
        segments,
    })
}

/// Whether a track's language already covers the requested target, so
/// translation would be a no-op ("en-US" serves "en")
fn serves_language(track_code: &str, target: &str) -> bool {
    track_code.eq_ignore_ascii_case(target)
        || track_code
            .split('-')
            .next()
            .is_some_and(|subtag| subtag.eq_ignore_ascii_case(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CaptionCatalog, MockTranscriptSource, SourceError};

    fn track(language_code: &str, kind: TrackKind) -> CaptionTrack {
        CaptionTrack {
            video_id: "dQw4w9WgXcQ".to_string(),
            language_code: language_code.to_string(),
            name: None,
            kind,
            is_translatable: true,
            base_url: format!("https://timedtext.example/{language_code}"),
        }
    }

    fn catalog(tracks: Vec<CaptionTrack>) -> CaptionCatalog {
        CaptionCatalog {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: Some("Demo video".to_string()),
            tracks,
        }
    }

    fn segments(text: &str) -> Vec<TranscriptSegment> {
        vec![TranscriptSegment {
            start: 0.0,
            duration: 1.0,
            text: text.to_string(),
        }]
    }

    fn policy(preferred: &[&str], fallback: &[&str], target: Option<&str>) -> LanguagePolicy {
        LanguagePolicy {
            preferred: preferred.iter().map(|s| s.to_string()).collect(),
            fallback: fallback.iter().map(|s| s.to_string()).collect(),
            target: target.map(|s| s.to_string()),
        }
    }

    #[tokio::test]
    async fn test_manual_track_outranks_generated() {
        let mut source = MockTranscriptSource::new();
        source.expect_list_tracks().returning(|_| {
            Ok(catalog(vec![
                track("es", TrackKind::Manual),
                track("en", TrackKind::Generated),
            ]))
        });
        source
            .expect_fetch_segments()
            .withf(|track| track.language_code == "es" && track.kind == TrackKind::Manual)
            .returning(|_| Ok(segments("hola")));
        source.expect_translate().never();

        let selection = select_transcript(&source, "dQw4w9WgXcQ", &policy(&["es", "en"], &["en", "es"], None))
            .await
            .unwrap();

        assert_eq!(selection.track.language_code, "es");
        assert_eq!(selection.track.kind, TrackKind::Manual);
        assert!(selection.source_language.is_none());
        assert_eq!(selection.segments[0].text, "hola");
    }

    #[tokio::test]
    async fn test_generated_track_used_when_no_manual_matches() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_tracks()
            .returning(|_| Ok(catalog(vec![track("en", TrackKind::Generated)])));
        source
            .expect_fetch_segments()
            .withf(|track| track.kind == TrackKind::Generated)
            .returning(|_| Ok(segments("hello")));

        let selection = select_transcript(&source, "dQw4w9WgXcQ", &policy(&["es", "en"], &["en", "es"], None))
            .await
            .unwrap();

        assert_eq!(selection.track.language_code, "en");
        assert_eq!(selection.track.kind, TrackKind::Generated);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_no_transcript_available() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_tracks()
            .returning(|_| Ok(catalog(Vec::new())));
        source.expect_fetch_segments().never();

        let result = select_transcript(&source, "dQw4w9WgXcQ", &policy(&["es"], &["en"], None)).await;

        match result {
            Err(TranscriptError::NoTranscriptAvailable { available }) => {
                assert!(available.is_empty());
            }
            other => panic!("expected NoTranscriptAvailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_catalog_listing_failure_is_catalog_unavailable() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_tracks()
            .returning(|_| Err(SourceError::Status(429)));

        let result = select_transcript(&source, "dQw4w9WgXcQ", &policy(&["es"], &["en"], None)).await;
        assert!(matches!(result, Err(TranscriptError::CatalogUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_translation_failure_does_not_fall_back_to_original() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_tracks()
            .returning(|_| Ok(catalog(vec![track("en", TrackKind::Manual)])));
        source
            .expect_translate()
            .returning(|_, _| Err(SourceError::NotTranslatable("en".to_string())));
        source.expect_fetch_segments().never();

        let result =
            select_transcript(&source, "dQw4w9WgXcQ", &policy(&["en"], &["en"], Some("es"))).await;

        match result {
            Err(TranscriptError::TranslationFailed { target, .. }) => assert_eq!(target, "es"),
            other => panic!("expected TranslationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_translation_requested_when_target_differs() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_tracks()
            .returning(|_| Ok(catalog(vec![track("en", TrackKind::Manual)])));
        source
            .expect_translate()
            .withf(|track, target| track.language_code == "en" && target == "es")
            .returning(|track, target| {
                Ok(CaptionTrack {
                    language_code: target.to_string(),
                    is_translatable: false,
                    ..track.clone()
                })
            });
        source
            .expect_fetch_segments()
            .withf(|track| track.language_code == "es")
            .returning(|_| Ok(segments("hola")));

        let selection =
            select_transcript(&source, "dQw4w9WgXcQ", &policy(&["en"], &["en"], Some("es")))
                .await
                .unwrap();

        assert_eq!(selection.track.language_code, "es");
        assert_eq!(selection.source_language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_translation_skipped_when_track_already_serves_target() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_tracks()
            .returning(|_| Ok(catalog(vec![track("es-419", TrackKind::Manual)])));
        source.expect_translate().never();
        source
            .expect_fetch_segments()
            .returning(|_| Ok(segments("hola")));

        let selection =
            select_transcript(&source, "dQw4w9WgXcQ", &policy(&["es"], &["en"], Some("es")))
                .await
                .unwrap();

        assert_eq!(selection.track.language_code, "es-419");
        assert!(selection.source_language.is_none());
    }

    #[tokio::test]
    async fn test_segment_fetch_failure_is_fetch_failed() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_tracks()
            .returning(|_| Ok(catalog(vec![track("es", TrackKind::Manual)])));
        source
            .expect_fetch_segments()
            .returning(|_| Err(SourceError::RequestFailed("connection reset".to_string())));

        let result = select_transcript(&source, "dQw4w9WgXcQ", &policy(&["es"], &["en"], None)).await;
        assert!(matches!(result, Err(TranscriptError::FetchFailed(_))));
    }

    #[test]
    fn test_serves_language_subtag() {
        assert!(serves_language("es", "es"));
        assert!(serves_language("es-419", "es"));
        assert!(serves_language("EN-us", "en"));
        assert!(!serves_language("en", "es"));
    }
}
