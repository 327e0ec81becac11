use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::lang::LanguageTable;
use crate::media::{AudioExtractorFactory, AudioExtractorTrait};
use crate::speech::{Detection, LanguageDetector, SpeechApi, SpeechApiFactory};
use crate::storage::{AudioStore, AudioStoreFactory};
use crate::subtitle;
use crate::transcribe::{TranscriptionEngine, TranscriptionResult};
use crate::translate::TranslatorFactory;

/// Output of one pipeline run: the transcription result plus its SRT
/// rendering. The SRT bytes are a pure function of the segments, so callers
/// may regenerate them at any time.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub result: TranscriptionResult,
    pub srt: Vec<u8>,
}

/// Audio-to-subtitle pipeline for a single video.
///
/// Each `run` is one logical thread of control from extraction through
/// encoding; no state is shared between runs. Only the extraction and
/// storage stages are fatal; everything downstream degrades to an empty or
/// partial caption set.
pub struct Pipeline {
    extractor: Box<dyn AudioExtractorTrait>,
    store: Box<dyn AudioStore>,
    speech: Arc<dyn SpeechApi>,
    detector: LanguageDetector,
    engine: TranscriptionEngine,
    table: LanguageTable,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let table = LanguageTable::default();
        let extractor = AudioExtractorFactory::create_extractor(config.media.clone());
        let store = AudioStoreFactory::create_store(config.storage.clone());
        let speech: Arc<dyn SpeechApi> =
            Arc::from(SpeechApiFactory::create_client(config.speech.clone()));
        let detector = LanguageDetector::new(&config.speech, table.clone());
        let translator = Arc::from(TranslatorFactory::create_translator(config.translate.clone()));
        let engine = TranscriptionEngine::new(speech.clone(), translator, config.speech.model.clone());

        Self {
            extractor,
            store,
            speech,
            detector,
            engine,
            table,
        }
    }

    /// Verify external collaborators before a run
    pub async fn check_availability(&self) -> Result<()> {
        self.extractor.check_availability().await
    }

    /// Run the full pipeline on a video byte source.
    ///
    /// `name_hint` names the stored audio artifact; `source_hint` skips
    /// detection when the caller already knows the spoken language.
    pub async fn run(
        &self,
        video: Box<dyn AsyncRead + Unpin + Send>,
        name_hint: &str,
        source_hint: Option<&str>,
        target_language: &str,
    ) -> Result<PipelineOutput> {
        // Fatal stage: without audio there is nothing to do
        let wav = self.extractor.extract(video).await?;
        self.run_audio(&wav, name_hint, source_hint, target_language)
            .await
    }

    /// Run the pipeline stages downstream of extraction on a WAV buffer.
    pub async fn run_audio(
        &self,
        wav: &[u8],
        name_hint: &str,
        source_hint: Option<&str>,
        target_language: &str,
    ) -> Result<PipelineOutput> {
        // Storage is fatal too: the speech API needs a locator
        let locator = self.store.store(wav, name_hint).await?;

        let detection = match source_hint {
            Some(language) => Detection::Hinted(self.table.normalize(language)),
            None => self.detector.detect(self.speech.as_ref(), &locator).await,
        };
        let source_language = detection.code().to_string();
        let target_language = self.table.normalize(target_language);

        info!(
            "Pipeline languages: source={}, target={}",
            source_language, target_language
        );

        let result = self
            .engine
            .run(&locator, &source_language, &target_language)
            .await;

        let srt = subtitle::encode_bytes(&result.segments);

        Ok(PipelineOutput { result, srt })
    }
}
