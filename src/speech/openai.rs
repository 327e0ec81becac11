use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{SpeechApi, SpeechRequest, VerboseTranscription};
use crate::config::SpeechConfig;
use crate::error::{CapgenError, Result};

/// HTTP client for OpenAI/Groq-compatible speech endpoints
pub struct OpenAiSpeechClient {
    client: Client,
    config: SpeechConfig,
}

impl OpenAiSpeechClient {
    pub fn new(config: SpeechConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self { client, config }
    }

    async fn post_audio(&self, path: &str, request: &SpeechRequest) -> Result<VerboseTranscription> {
        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path);

        debug!("Sending speech request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CapgenError::Speech(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CapgenError::Speech(format!(
                "Speech API error {}: {}",
                status, error_text
            )));
        }

        response
            .json::<VerboseTranscription>()
            .await
            .map_err(|e| CapgenError::Speech(format!("Failed to parse speech response: {}", e)))
    }
}

#[async_trait]
impl SpeechApi for OpenAiSpeechClient {
    async fn transcribe(&self, request: &SpeechRequest) -> Result<VerboseTranscription> {
        info!("Requesting transcription with model {}", request.model);
        self.post_audio("audio/transcriptions", request).await
    }

    async fn translate(
        &self,
        request: &SpeechRequest,
        target_language: &str,
    ) -> Result<VerboseTranscription> {
        // The whisper-style translations endpoint only emits English; the
        // target is still logged so the call is auditable against the policy
        // that chose it.
        if target_language != "en" {
            warn!(
                "Speech translation endpoint targets English; requested target was {}",
                target_language
            );
        }

        info!("Requesting speech translation with model {}", request.model);
        self.post_audio("audio/translations", request).await
    }
}
