// Speech API abstraction
//
// This module provides the client seam for OpenAI-compatible speech services:
// - openai: HTTP client for audio/transcriptions and audio/translations
// - detect: best-effort language detection built on the same capability
//
// To add a new speech service, implement SpeechApi for it and extend the
// factory; the engine and detector only see the trait.

pub mod detect;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use detect::*;
pub use openai::*;

use crate::config::SpeechConfig;
use crate::error::Result;

/// Request body for speech transcription/translation calls
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    /// Locator of the audio resource to process
    pub url: String,
    /// Speech model name
    pub model: String,
    /// Response format; verbose_json carries language and segment timing
    pub response_format: String,
    /// Source language hint for transcription calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SpeechRequest {
    pub fn verbose<S1: Into<String>, S2: Into<String>>(url: S1, model: S2) -> Self {
        Self {
            url: url.into(),
            model: model.into(),
            response_format: "verbose_json".to_string(),
            language: None,
        }
    }

    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Raw timed segment as returned by the speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Verbose transcription payload. Missing fields are tolerated so schema
/// drift degrades rather than fails; callers decide what absence means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerboseTranscription {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub segments: Vec<RawSegment>,
    #[serde(default)]
    pub text: String,
}

/// Main trait for speech-to-text operations
#[async_trait]
pub trait SpeechApi: Send + Sync {
    /// Transcribe audio in its source language
    async fn transcribe(&self, request: &SpeechRequest) -> Result<VerboseTranscription>;

    /// Translate audio directly to the target language. The target is carried
    /// for the seam even where a backend only supports English output.
    async fn translate(&self, request: &SpeechRequest, target_language: &str)
        -> Result<VerboseTranscription>;
}

/// Factory for creating speech API clients
pub struct SpeechApiFactory;

impl SpeechApiFactory {
    /// Create the default OpenAI-compatible client
    pub fn create_client(config: SpeechConfig) -> Box<dyn SpeechApi> {
        Box::new(openai::OpenAiSpeechClient::new(config))
    }
}
