use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{SegmentTranslation, TranslatorTrait};
use crate::config::TranslateConfig;
use crate::error::{CapgenError, Result};
use crate::lang::language_name;

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completion translator issuing one request per segment.
///
/// The system instruction fixes the translation direction and requires
/// numbers and proper nouns to pass through unchanged. Temperature is low
/// and output length bounded so repeated runs stay close to deterministic.
pub struct ChatTranslator {
    client: Client,
    config: TranslateConfig,
}

impl ChatTranslator {
    pub fn new(config: TranslateConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self { client, config }
    }

    fn system_prompt(&self, source_language: &str) -> String {
        format!(
            "Translate the following text from {} to {}. \
             Maintain exact meaning, preserve numbers and proper nouns.",
            language_name(source_language),
            language_name(&self.config.target_language)
        )
    }

    async fn request_translation(&self, text: &str, source_language: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt(source_language),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.trim().to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CapgenError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CapgenError::Translation(format!(
                "Chat API error {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CapgenError::Translation(format!("Failed to parse response: {}", e)))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(CapgenError::Translation(
                "Empty translation received".to_string(),
            ));
        }

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl TranslatorTrait for ChatTranslator {
    async fn translate_segment(&self, text: &str, source_language: &str) -> SegmentTranslation {
        match self.request_translation(text, source_language).await {
            Ok(translation) => SegmentTranslation::Translated(translation),
            Err(e) => {
                warn!("Segment translation failed, keeping original: {}", e);
                SegmentTranslation::Original(text.to_string())
            }
        }
    }

    fn target_language(&self) -> &str {
        &self.config.target_language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> ChatTranslator {
        ChatTranslator::new(crate::config::Config::default().translate)
    }

    #[test]
    fn test_system_prompt_fixes_direction_and_literals() {
        let prompt = translator().system_prompt("en");
        assert!(prompt.contains("from English to Hebrew"));
        assert!(prompt.contains("preserve numbers and proper nouns"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back_to_original() {
        let mut config = crate::config::Config::default().translate;
        config.endpoint = "http://127.0.0.1:1/v1".to_string();
        config.timeout_secs = 1;
        let translator = ChatTranslator::new(config);

        let outcome = translator.translate_segment("Hello world", "en").await;
        assert_eq!(
            outcome,
            SegmentTranslation::Original("Hello world".to_string())
        );
    }
}
