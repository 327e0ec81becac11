use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CapgenError, Result};

// Default values for speech API configuration
fn default_speech_timeout() -> u64 {
    60
}

fn default_translate_timeout() -> u64 {
    30
}

fn default_storage_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub media: MediaConfig,
    pub speech: SpeechConfig,
    pub translate: TranslateConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// OpenAI-compatible API base URL (e.g. https://api.groq.com/openai/v1)
    pub endpoint: String,
    /// API key; defaults to the GROQ_API_KEY environment variable
    pub api_key: String,
    /// Speech model for transcription and translation calls
    pub model: String,
    /// Language assumed when detection cannot produce one
    pub fallback_language: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// OpenAI-compatible API base URL for chat completions
    pub endpoint: String,
    /// API key; defaults to the GROQ_API_KEY environment variable
    pub api_key: String,
    /// Chat model used for per-segment translation
    pub model: String,
    /// Target language for segment translation
    pub target_language: String,
    /// Sampling temperature; kept low for deterministic-leaning output
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on completion length per segment
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-request timeout in seconds
    #[serde(default = "default_translate_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StorageMode {
    /// Local: write WAV files to a local directory and address them by path
    Local,
    /// Http: upload WAV files via HTTP PUT and address them by public URL
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where extracted audio is stored so the speech API can address it
    pub mode: StorageMode,
    /// Directory for Local mode
    pub local_dir: String,
    /// Upload base URL for Http mode
    pub endpoint: String,
    /// Access key sent with Http uploads
    pub access_key: String,
    /// Public base URL returned as the locator in Http mode
    pub public_base_url: String,
    /// Per-request timeout in seconds for Http uploads
    #[serde(default = "default_storage_timeout")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let api_key = std::env::var("GROQ_API_KEY").unwrap_or_default();
        Self {
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
            },
            speech: SpeechConfig {
                endpoint: "https://api.groq.com/openai/v1".to_string(),
                api_key: api_key.clone(),
                model: "whisper-large-v3".to_string(),
                fallback_language: "en".to_string(),
                timeout_secs: default_speech_timeout(),
            },
            translate: TranslateConfig {
                endpoint: "https://api.groq.com/openai/v1".to_string(),
                api_key,
                model: "llama-3.3-70b-versatile".to_string(),
                target_language: "he".to_string(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
                timeout_secs: default_translate_timeout(),
            },
            storage: StorageConfig {
                mode: StorageMode::Local,
                local_dir: ".capgen/audio".to_string(),
                endpoint: String::new(),
                access_key: String::new(),
                public_base_url: String::new(),
                timeout_secs: default_storage_timeout(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CapgenError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CapgenError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CapgenError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CapgenError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
