use tracing::{info, warn};

use super::{SpeechApi, SpeechRequest};
use crate::config::SpeechConfig;
use crate::lang::LanguageTable;

/// Tagged outcome of language detection.
///
/// Detection is best-effort: any failure is folded into `Defaulted` rather
/// than surfaced, so a run can never abort here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// The speech service reported a language and it was normalized
    Detected(String),
    /// The caller asserted the language; no detection call was made
    Hinted(String),
    /// Detection failed or the payload had no language field
    Defaulted(String),
}

impl Detection {
    pub fn code(&self) -> &str {
        match self {
            Detection::Detected(code)
            | Detection::Hinted(code)
            | Detection::Defaulted(code) => code,
        }
    }
}

/// Best-effort language detector built on the speech capability
pub struct LanguageDetector {
    model: String,
    fallback_language: String,
    table: LanguageTable,
}

impl LanguageDetector {
    pub fn new(config: &SpeechConfig, table: LanguageTable) -> Self {
        Self {
            model: config.model.clone(),
            fallback_language: config.fallback_language.clone(),
            table,
        }
    }

    /// Detect the spoken language of the audio behind `audio_url`.
    pub async fn detect(&self, speech: &dyn SpeechApi, audio_url: &str) -> Detection {
        info!("Start language detection");

        let request = SpeechRequest::verbose(audio_url, &self.model);

        let raw = match speech.transcribe(&request).await {
            Ok(response) => response.language,
            Err(e) => {
                warn!("Language detection call failed, defaulting: {}", e);
                None
            }
        };

        let detection = match raw {
            Some(language) if !language.trim().is_empty() => {
                Detection::Detected(self.table.normalize(&language))
            }
            _ => Detection::Defaulted(self.table.normalize(&self.fallback_language)),
        };

        info!("Detected language: {}", detection.code());
        detection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CapgenError, Result};
    use crate::speech::{SpeechApi, SpeechRequest, VerboseTranscription};
    use async_trait::async_trait;

    struct FixedLanguageApi {
        language: Option<String>,
        fail: bool,
    }

    #[async_trait]
    impl SpeechApi for FixedLanguageApi {
        async fn transcribe(&self, _request: &SpeechRequest) -> Result<VerboseTranscription> {
            if self.fail {
                return Err(CapgenError::Speech("connection refused".to_string()));
            }
            Ok(VerboseTranscription {
                language: self.language.clone(),
                ..Default::default()
            })
        }

        async fn translate(
            &self,
            _request: &SpeechRequest,
            _target_language: &str,
        ) -> Result<VerboseTranscription> {
            unreachable!("detection never calls translate")
        }
    }

    fn detector() -> LanguageDetector {
        let config = crate::config::Config::default();
        LanguageDetector::new(&config.speech, LanguageTable::default())
    }

    #[tokio::test]
    async fn test_detects_and_normalizes_language_name() {
        let api = FixedLanguageApi {
            language: Some("Hebrew".to_string()),
            fail: false,
        };
        let detection = detector().detect(&api, "file:///a.wav").await;
        assert_eq!(detection, Detection::Detected("he".to_string()));
    }

    #[tokio::test]
    async fn test_defaults_when_language_missing() {
        let api = FixedLanguageApi {
            language: None,
            fail: false,
        };
        let detection = detector().detect(&api, "file:///a.wav").await;
        assert_eq!(detection, Detection::Defaulted("en".to_string()));
    }

    #[test]
    fn test_hinted_outcome_is_distinct_from_detected() {
        let hinted = Detection::Hinted("en".to_string());
        assert_eq!(hinted.code(), "en");
        assert_ne!(hinted, Detection::Detected("en".to_string()));
    }

    #[tokio::test]
    async fn test_defaults_when_call_fails() {
        let api = FixedLanguageApi {
            language: None,
            fail: true,
        };
        let detection = detector().detect(&api, "file:///a.wav").await;
        assert_eq!(detection, Detection::Defaulted("en".to_string()));
    }
}
