use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{StorageConfig, StorageMode};
use crate::error::{CapgenError, Result};

/// Narrow collaborator contract: persist a WAV buffer somewhere the speech
/// API can reach and hand back a locator string for it.
#[async_trait]
pub trait AudioStore: Send + Sync {
    async fn store(&self, wav: &[u8], name_hint: &str) -> Result<String>;
}

fn unique_name(name_hint: &str) -> String {
    let stem = name_hint
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect::<String>();
    format!("{}_{}.wav", Uuid::new_v4().simple(), stem)
}

/// Stores audio under a local directory; the locator is the file path.
pub struct LocalAudioStore {
    dir: PathBuf,
}

impl LocalAudioStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl AudioStore for LocalAudioStore {
    async fn store(&self, wav: &[u8], name_hint: &str) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CapgenError::Storage(format!("Failed to create audio directory: {}", e)))?;

        let path = self.dir.join(unique_name(name_hint));
        tokio::fs::write(&path, wav)
            .await
            .map_err(|e| CapgenError::Storage(format!("Failed to write audio file: {}", e)))?;

        debug!("Stored {} bytes at {}", wav.len(), path.display());
        Ok(path.display().to_string())
    }
}

/// Uploads audio via HTTP PUT; the locator is the public URL.
pub struct HttpAudioStore {
    client: Client,
    config: StorageConfig,
}

impl HttpAudioStore {
    pub fn new(config: StorageConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self { client, config }
    }
}

#[async_trait]
impl AudioStore for HttpAudioStore {
    async fn store(&self, wav: &[u8], name_hint: &str) -> Result<String> {
        let name = unique_name(name_hint);
        let upload_url = format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            name
        );

        info!("Uploading audio to {}", upload_url);

        let response = self
            .client
            .put(&upload_url)
            .header("AccessKey", &self.config.access_key)
            .header("Content-Type", "application/octet-stream")
            .body(wav.to_vec())
            .send()
            .await
            .map_err(|e| CapgenError::Storage(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CapgenError::Storage(format!(
                "Upload failed: {}",
                response.status()
            )));
        }

        Ok(format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            name
        ))
    }
}

/// Factory for creating audio store instances
pub struct AudioStoreFactory;

impl AudioStoreFactory {
    pub fn create_store(config: StorageConfig) -> Box<dyn AudioStore> {
        match config.mode {
            StorageMode::Local => Box::new(LocalAudioStore::new(config.local_dir)),
            StorageMode::Http => Box::new(HttpAudioStore::new(config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_store_writes_unique_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAudioStore::new(dir.path());

        let first = store.store(b"RIFF....", "clip.mp4").await.unwrap();
        let second = store.store(b"RIFF....", "clip.mp4").await.unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with(".wav"));
        assert_eq!(tokio::fs::read(&first).await.unwrap(), b"RIFF....");
    }

    #[test]
    fn test_unique_name_sanitizes_hint() {
        let name = unique_name("my movie (1).mp4");
        assert!(!name.contains(' '));
        assert!(!name.contains('('));
        assert!(name.ends_with(".wav"));
    }
}
