use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

use super::{AudioExtractorTrait, MediaCommandBuilder};
use crate::config::MediaConfig;
use crate::error::{CapgenError, Result};

/// ffmpeg-based audio extractor.
///
/// Each extraction spawns exactly one transcoder process. The video source is
/// streamed to the child's stdin while WAV output is collected from stdout in
/// chunks as the child produces them. `kill_on_drop` on the child guarantees
/// the process and its pipes are released on every exit path, including early
/// consumer abandonment.
pub struct FfmpegExtractor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegExtractor {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl AudioExtractorTrait for FfmpegExtractor {
    async fn extract(&self, video: Box<dyn AsyncRead + Unpin + Send>) -> Result<Vec<u8>> {
        info!("Extracting audio from video stream");

        let command = self.command_builder.extract_audio_stream();
        let mut child = command
            .build(Stdio::piped(), Stdio::piped(), Stdio::piped())
            .spawn()
            .map_err(|e| CapgenError::Extraction(format!("Failed to spawn ffmpeg: {}", e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CapgenError::Extraction("Failed to open ffmpeg stdin".to_string()))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CapgenError::Extraction("Failed to open ffmpeg stdout".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| CapgenError::Extraction("Failed to open ffmpeg stderr".to_string()))?;

        // Feed the video source and drain stderr concurrently with the stdout
        // read; ffmpeg blocks if either pipe fills up. A write error here means
        // ffmpeg exited early, which the exit status check below reports.
        let writer = tokio::spawn(async move {
            let mut video = video;
            let _ = tokio::io::copy(&mut video, &mut stdin).await;
        });
        let diagnostics = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
            buf
        });

        let mut wav = Vec::new();
        stdout
            .read_to_end(&mut wav)
            .await
            .map_err(|e| CapgenError::Extraction(format!("Failed to read ffmpeg output: {}", e)))?;

        let status = child
            .wait()
            .await
            .map_err(|e| CapgenError::Extraction(format!("Failed to wait for ffmpeg: {}", e)))?;

        writer.abort();
        let stderr_buf = diagnostics.await.unwrap_or_default();

        if !status.success() {
            let diagnostic = String::from_utf8_lossy(&stderr_buf);
            return Err(CapgenError::Extraction(format!(
                "Audio extraction failed: {}",
                diagnostic
            )));
        }

        debug!("Extracted {} bytes of WAV audio", wav.len());
        info!("Audio extraction completed");
        Ok(wav)
    }

    async fn extract_file(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!(
            "Extracting audio from {} to {}",
            video_path.display(),
            audio_path.display()
        );

        let command = self.command_builder.extract_audio(video_path, audio_path);
        command.execute().await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        let command = self.command_builder.version_check();
        command.execute().await.map_err(|_| {
            CapgenError::Extraction(format!(
                "Transcoder not available: {}",
                self.config.binary_path
            ))
        })?;

        info!("Transcoder is available");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediaConfig;

    fn extractor_with_binary(binary: &str) -> FfmpegExtractor {
        FfmpegExtractor::new(MediaConfig {
            binary_path: binary.to_string(),
        })
    }

    #[tokio::test]
    async fn test_extract_with_missing_binary_is_fatal() {
        let extractor = extractor_with_binary("/nonexistent/ffmpeg-binary");
        let video: Box<dyn tokio::io::AsyncRead + Unpin + Send> =
            Box::new(std::io::Cursor::new(vec![0u8; 16]));

        let result = extractor.extract(video).await;
        assert!(matches!(result, Err(CapgenError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_availability_check_with_missing_binary() {
        let extractor = extractor_with_binary("/nonexistent/ffmpeg-binary");
        assert!(extractor.check_availability().await.is_err());
    }
}
