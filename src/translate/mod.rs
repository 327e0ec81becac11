// Per-segment translation
//
// The engine talks to translation through TranslatorTrait so the sequential
// segment loop can be tested without a live chat API.

pub mod chat;

use async_trait::async_trait;

pub use chat::*;

use crate::config::TranslateConfig;

/// Tagged outcome of one segment translation.
///
/// Translation is best-effort per segment: a failed call yields `Original`
/// so the segment survives untranslated instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentTranslation {
    Translated(String),
    Original(String),
}

impl SegmentTranslation {
    pub fn into_text(self) -> String {
        match self {
            SegmentTranslation::Translated(text) | SegmentTranslation::Original(text) => text,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            SegmentTranslation::Translated(text) | SegmentTranslation::Original(text) => text,
        }
    }
}

/// Main trait for per-segment translation operations
#[async_trait]
pub trait TranslatorTrait: Send + Sync {
    /// Translate one segment's trimmed text from the source language to the
    /// configured target. Never errors; failures fold into the outcome.
    async fn translate_segment(&self, text: &str, source_language: &str) -> SegmentTranslation;

    /// Target language this translator produces
    fn target_language(&self) -> &str;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the default chat-completion translator
    pub fn create_translator(config: TranslateConfig) -> Box<dyn TranslatorTrait> {
        Box::new(chat::ChatTranslator::new(config))
    }
}
