// Media processing abstraction
//
// - Commands: ffmpeg argument builders
// - Extractor: streaming audio extraction implementation

pub mod commands;
pub mod extractor;

use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncRead;

pub use commands::*;
pub use extractor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for audio extraction operations
#[async_trait]
pub trait AudioExtractorTrait: Send + Sync {
    /// Extract mono 16 kHz WAV audio from a video byte source into a buffer
    async fn extract(&self, video: Box<dyn AsyncRead + Unpin + Send>) -> Result<Vec<u8>>;

    /// Extract audio from a video file to an audio file
    async fn extract_file(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Check if the underlying transcoder binary is available
    async fn check_availability(&self) -> Result<()>;
}

/// Factory for creating extractor instances
pub struct AudioExtractorFactory;

impl AudioExtractorFactory {
    /// Create the default extractor implementation (ffmpeg-based)
    pub fn create_extractor(config: MediaConfig) -> Box<dyn AudioExtractorTrait> {
        Box::new(extractor::FfmpegExtractor::new(config))
    }
}
