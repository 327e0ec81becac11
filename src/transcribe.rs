use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::speech::{SpeechApi, SpeechRequest, VerboseTranscription};
use crate::translate::TranslatorTrait;

/// A timed span of transcribed/translated speech.
///
/// Invariants after filtering: `end > start` and `text` is non-empty after
/// trimming. Segments keep the chronological order of the audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Result of one transcription run.
///
/// `sample_text` is the first raw segment's text, retained for diagnostics
/// even when segments are filtered out or their text replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub segments: Vec<Segment>,
    pub detected_language: String,
    pub sample_text: String,
}

impl TranscriptionResult {
    fn empty(source_language: &str) -> Self {
        Self {
            segments: Vec::new(),
            detected_language: source_language.to_lowercase(),
            sample_text: String::new(),
        }
    }
}

/// Which speech call produced the raw response
#[derive(Debug, Clone)]
pub enum RawTranscription {
    /// Direct translate-to-target call succeeded
    Translated(VerboseTranscription),
    /// Transcribe-in-source call, either chosen directly or as fallback
    Transcribed(VerboseTranscription),
}

impl RawTranscription {
    fn into_inner(self) -> VerboseTranscription {
        match self {
            RawTranscription::Translated(inner) | RawTranscription::Transcribed(inner) => inner,
        }
    }
}

/// Transcription engine: speech call policy, data-quality filtering, and the
/// sequential per-segment translation pass.
pub struct TranscriptionEngine {
    speech: Arc<dyn SpeechApi>,
    translator: Arc<dyn TranslatorTrait>,
    model: String,
}

impl TranscriptionEngine {
    pub fn new(
        speech: Arc<dyn SpeechApi>,
        translator: Arc<dyn TranslatorTrait>,
        model: String,
    ) -> Self {
        Self {
            speech,
            translator,
            model,
        }
    }

    /// Run transcription for the audio behind `audio_url`.
    ///
    /// Never errors: any unrecoverable failure degrades to an empty result
    /// carrying the assumed source language, so the caller can still finish
    /// a run without captions.
    pub async fn run(
        &self,
        audio_url: &str,
        source_language: &str,
        target_language: &str,
    ) -> TranscriptionResult {
        info!("Start transcription");

        match self
            .run_inner(audio_url, source_language, target_language)
            .await
        {
            Ok(result) => {
                info!(
                    "Transcription completed with {} segments, detected language: {}",
                    result.segments.len(),
                    result.detected_language
                );
                result
            }
            Err(e) => {
                warn!("Transcription failed, returning empty result: {}", e);
                TranscriptionResult::empty(source_language)
            }
        }
    }

    async fn run_inner(
        &self,
        audio_url: &str,
        source_language: &str,
        target_language: &str,
    ) -> crate::error::Result<TranscriptionResult> {
        let raw = self
            .fetch_raw(audio_url, source_language, target_language)
            .await?;
        let response = raw.into_inner();

        // A payload without a language field is treated as schema drift; the
        // assumed source language stands in rather than failing the run.
        let detected_language = response
            .language
            .as_deref()
            .filter(|language| !language.trim().is_empty())
            .unwrap_or(source_language)
            .to_lowercase();

        let sample_text = response
            .segments
            .first()
            .map(|segment| segment.text.clone())
            .unwrap_or_default();

        let mut segments = Vec::with_capacity(response.segments.len());
        let total = response.segments.len();

        for (index, raw_segment) in response.segments.iter().enumerate() {
            let text = raw_segment.text.trim();

            // Hard data-quality gate: malformed segments never reach output
            if raw_segment.end <= raw_segment.start || text.is_empty() {
                debug!(
                    "Dropping malformed segment {}/{} (start={}, end={})",
                    index + 1,
                    total,
                    raw_segment.start,
                    raw_segment.end
                );
                continue;
            }

            info!("Segment {}/{} source: {}", index + 1, total, text);

            // Strictly sequential: segment i resolves before i+1 starts, so
            // external-call load stays at one in-flight request and log lines
            // map 1:1 to segment indices.
            let translation = self.translator.translate_segment(text, source_language).await;

            info!("Segment {}/{} target: {}", index + 1, total, translation.text());

            segments.push(Segment {
                start: raw_segment.start,
                end: raw_segment.end,
                text: translation.into_text(),
            });
        }

        Ok(TranscriptionResult {
            segments,
            detected_language,
            sample_text,
        })
    }

    /// Choose between the translate-to-target and transcribe-in-source calls.
    async fn fetch_raw(
        &self,
        audio_url: &str,
        source_language: &str,
        target_language: &str,
    ) -> crate::error::Result<RawTranscription> {
        if target_language != source_language {
            let request = SpeechRequest::verbose(audio_url, &self.model);
            match self.speech.translate(&request, target_language).await {
                Ok(response) => return Ok(RawTranscription::Translated(response)),
                Err(e) => {
                    warn!("Translate call failed, falling back to transcription: {}", e);
                }
            }
        }

        let request =
            SpeechRequest::verbose(audio_url, &self.model).with_language(source_language);
        let response = self.speech.transcribe(&request).await?;
        Ok(RawTranscription::Transcribed(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CapgenError, Result};
    use crate::speech::RawSegment;
    use crate::translate::SegmentTranslation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scriptable speech API for engine tests
    struct MockSpeechApi {
        translate_response: Result<VerboseTranscription>,
        transcribe_response: Result<VerboseTranscription>,
        translate_calls: AtomicUsize,
        transcribe_calls: AtomicUsize,
    }

    impl MockSpeechApi {
        fn new(
            translate_response: Result<VerboseTranscription>,
            transcribe_response: Result<VerboseTranscription>,
        ) -> Self {
            Self {
                translate_response,
                transcribe_response,
                translate_calls: AtomicUsize::new(0),
                transcribe_calls: AtomicUsize::new(0),
            }
        }
    }

    fn clone_result(result: &Result<VerboseTranscription>) -> Result<VerboseTranscription> {
        match result {
            Ok(value) => Ok(value.clone()),
            Err(e) => Err(CapgenError::Speech(e.to_string())),
        }
    }

    #[async_trait]
    impl SpeechApi for MockSpeechApi {
        async fn transcribe(&self, _request: &SpeechRequest) -> Result<VerboseTranscription> {
            self.transcribe_calls.fetch_add(1, Ordering::SeqCst);
            clone_result(&self.transcribe_response)
        }

        async fn translate(
            &self,
            _request: &SpeechRequest,
            _target_language: &str,
        ) -> Result<VerboseTranscription> {
            self.translate_calls.fetch_add(1, Ordering::SeqCst);
            clone_result(&self.translate_response)
        }
    }

    /// Translator that uppercases text, or fails on a marked segment
    struct MockTranslator {
        fail_on: Option<String>,
    }

    #[async_trait]
    impl TranslatorTrait for MockTranslator {
        async fn translate_segment(&self, text: &str, _source_language: &str) -> SegmentTranslation {
            if self.fail_on.as_deref() == Some(text) {
                SegmentTranslation::Original(text.to_string())
            } else {
                SegmentTranslation::Translated(text.to_uppercase())
            }
        }

        fn target_language(&self) -> &str {
            "he"
        }
    }

    fn raw_segment(start: f64, end: f64, text: &str) -> RawSegment {
        RawSegment {
            start,
            end,
            text: text.to_string(),
        }
    }

    fn verbose(language: Option<&str>, segments: Vec<RawSegment>) -> VerboseTranscription {
        let text = segments
            .iter()
            .map(|segment| segment.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        VerboseTranscription {
            language: language.map(str::to_string),
            segments,
            text,
        }
    }

    fn engine(speech: MockSpeechApi, translator: MockTranslator) -> TranscriptionEngine {
        TranscriptionEngine::new(
            Arc::new(speech),
            Arc::new(translator),
            "whisper-large-v3".to_string(),
        )
    }

    fn speech_error() -> CapgenError {
        CapgenError::Speech("quota exceeded".to_string())
    }

    #[tokio::test]
    async fn test_translate_call_preferred_when_target_differs() {
        let speech = MockSpeechApi::new(
            Ok(verbose(Some("es"), vec![raw_segment(0.0, 1.0, "hola")])),
            Ok(verbose(Some("es"), vec![])),
        );
        let result = engine(speech, MockTranslator { fail_on: None })
            .run("file:///a.wav", "es", "he")
            .await;

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].text, "HOLA");
        assert_eq!(result.detected_language, "es");
    }

    #[tokio::test]
    async fn test_transcribe_used_directly_when_source_equals_target() {
        let speech = MockSpeechApi::new(
            Err(speech_error()),
            Ok(verbose(Some("he"), vec![raw_segment(0.0, 2.0, "shalom")])),
        );
        let speech = Arc::new(speech);
        let mock_engine = TranscriptionEngine::new(
            speech.clone(),
            Arc::new(MockTranslator { fail_on: None }),
            "whisper-large-v3".to_string(),
        );
        let result = mock_engine.run("file:///a.wav", "he", "he").await;

        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].text, "SHALOM");
        assert_eq!(speech.translate_calls.load(Ordering::SeqCst), 0);
        assert_eq!(speech.transcribe_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_to_transcribe_when_translate_fails() {
        let speech = MockSpeechApi::new(
            Err(speech_error()),
            Ok(verbose(
                Some("es"),
                vec![raw_segment(0.0, 1.5, "uno"), raw_segment(1.5, 3.0, "dos")],
            )),
        );
        let result = engine(speech, MockTranslator { fail_on: None })
            .run("file:///a.wav", "es", "he")
            .await;

        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].text, "UNO");
        assert_eq!(result.segments[1].text, "DOS");
    }

    #[tokio::test]
    async fn test_malformed_segments_filtered_in_order() {
        let speech = MockSpeechApi::new(
            Ok(verbose(
                Some("en"),
                vec![
                    raw_segment(0.0, 1.0, "first"),
                    raw_segment(1.0, 1.0, "zero duration"),
                    raw_segment(2.0, 3.0, "third"),
                    raw_segment(3.0, 4.0, "   "),
                ],
            )),
            Ok(verbose(Some("en"), vec![])),
        );
        let result = engine(speech, MockTranslator { fail_on: None })
            .run("file:///a.wav", "en", "he")
            .await;

        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.segments[0].text, "FIRST");
        assert_eq!(result.segments[1].text, "THIRD");
        for segment in &result.segments {
            assert!(segment.end > segment.start);
            assert!(!segment.text.trim().is_empty());
        }
    }

    #[tokio::test]
    async fn test_failed_segment_translation_keeps_original_in_place() {
        let speech = MockSpeechApi::new(
            Ok(verbose(
                Some("en"),
                vec![
                    raw_segment(0.0, 1.0, "alpha"),
                    raw_segment(1.0, 2.0, "beta"),
                    raw_segment(2.0, 3.0, "gamma"),
                ],
            )),
            Ok(verbose(Some("en"), vec![])),
        );
        let translator = MockTranslator {
            fail_on: Some("beta".to_string()),
        };
        let result = engine(speech, translator)
            .run("file:///a.wav", "en", "he")
            .await;

        assert_eq!(result.segments.len(), 3);
        assert_eq!(result.segments[0].text, "ALPHA");
        assert_eq!(result.segments[1].text, "beta");
        assert_eq!(result.segments[2].text, "GAMMA");
    }

    #[tokio::test]
    async fn test_both_calls_failing_degrades_to_empty_result() {
        let speech = MockSpeechApi::new(Err(speech_error()), Err(speech_error()));
        let result = engine(speech, MockTranslator { fail_on: None })
            .run("file:///a.wav", "es", "he")
            .await;

        assert!(result.segments.is_empty());
        assert_eq!(result.detected_language, "es");
        assert_eq!(result.sample_text, "");
    }

    #[tokio::test]
    async fn test_missing_language_falls_back_to_source() {
        let speech = MockSpeechApi::new(
            Ok(verbose(None, vec![raw_segment(0.0, 1.0, "hello")])),
            Ok(verbose(None, vec![])),
        );
        let result = engine(speech, MockTranslator { fail_on: None })
            .run("file:///a.wav", "fr", "he")
            .await;

        assert_eq!(result.detected_language, "fr");
    }

    #[tokio::test]
    async fn test_sample_text_retained_from_first_raw_segment() {
        let speech = MockSpeechApi::new(
            Ok(verbose(
                Some("en"),
                vec![
                    raw_segment(1.0, 1.0, "dropped sample"),
                    raw_segment(1.0, 2.0, "kept"),
                ],
            )),
            Ok(verbose(Some("en"), vec![])),
        );
        let result = engine(speech, MockTranslator { fail_on: None })
            .run("file:///a.wav", "en", "he")
            .await;

        // sample_text comes from the raw response, before filtering
        assert_eq!(result.sample_text, "dropped sample");
        assert_eq!(result.segments.len(), 1);
    }
}
