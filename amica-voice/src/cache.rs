//! On-disk cache of synthesized audio keyed by the spoken text

use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Greetings and apologies repeat constantly; caching their audio by text
/// digest skips the synthesis round-trip entirely on repeats.
pub struct TtsCache {
    dir: PathBuf,
}

impl TtsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, text: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(text.as_bytes()));
        self.dir.join(format!("{}.mp3", digest))
    }

    pub async fn get(&self, text: &str) -> Option<Bytes> {
        let path = self.path_for(text);
        match tokio::fs::read(&path).await {
            Ok(audio) => {
                debug!(path = %path.display(), "TTS cache hit");
                Some(Bytes::from(audio))
            }
            Err(_) => None,
        }
    }

    /// Store synthesized audio. Failures are logged and swallowed; the cache
    /// is an optimization, not a dependency.
    pub async fn put(&self, text: &str, audio: &Bytes) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!("Failed to create TTS cache dir: {}", e);
            return;
        }

        let path = self.path_for(text);
        if let Err(e) = tokio::fs::write(&path, audio).await {
            warn!("Failed to write TTS cache entry: {}", e);
        }
    }
}
