//! Speech output: fire-and-forget synthesis and playback with echo grace

use crate::cache::TtsCache;
use crate::config::VoiceConfig;
use crate::error::VoiceError;
use amica_core::Stopwatch;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// The speech-output contract the brain polls each tick. Speaking and
/// listening are mutually exclusive by policy: the brain never drives the
/// dialogue machine while `is_speaking` or `in_grace_period` report true.
pub trait SpeechOutput: Send {
    /// Queue `text` for synthesis and playback. Never blocks.
    fn say(&mut self, text: &str);
    fn is_speaking(&self) -> bool;
    /// True for a short window after playback ends, while the room may still
    /// carry the tail of the robot's own voice.
    fn in_grace_period(&self) -> bool;
}

/// Text-to-speech synthesis. The actual engine is out of scope.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Bytes, VoiceError>;
}

/// Audio playback. Resolves when the clip has finished playing.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: Bytes) -> Result<(), VoiceError>;
}

struct SpeakerState {
    speaking: bool,
    stopped_at: Option<Stopwatch>,
}

/// Drives a synthesizer and a sink from a spawned task per utterance; the
/// polled flags are the only coupling back to the tick thread.
pub struct Speaker {
    state: Arc<Mutex<SpeakerState>>,
    synthesizer: Arc<dyn Synthesizer>,
    sink: Arc<dyn AudioSink>,
    cache: Option<Arc<TtsCache>>,
    grace_period: Duration,
}

impl Speaker {
    pub fn new(
        config: &VoiceConfig,
        synthesizer: Arc<dyn Synthesizer>,
        sink: Arc<dyn AudioSink>,
    ) -> Self {
        let cache = config
            .cache_dir
            .as_ref()
            .map(|dir| Arc::new(TtsCache::new(dir.clone())));

        Self {
            state: Arc::new(Mutex::new(SpeakerState {
                speaking: false,
                stopped_at: None,
            })),
            synthesizer,
            sink,
            cache,
            grace_period: config.grace_period(),
        }
    }

    async fn fetch_audio(
        synthesizer: &Arc<dyn Synthesizer>,
        cache: &Option<Arc<TtsCache>>,
        text: &str,
    ) -> Result<Bytes, VoiceError> {
        if let Some(cache) = cache {
            if let Some(audio) = cache.get(text).await {
                return Ok(audio);
            }

            let audio = synthesizer.synthesize(text).await?;
            cache.put(text, &audio).await;
            return Ok(audio);
        }

        synthesizer.synthesize(text).await
    }
}

impl SpeechOutput for Speaker {
    fn say(&mut self, text: &str) {
        {
            let mut state = self.state.lock();
            state.speaking = true;
            state.stopped_at = None;
        }

        info!(text, "Speaking");

        let state = self.state.clone();
        let synthesizer = self.synthesizer.clone();
        let sink = self.sink.clone();
        let cache = self.cache.clone();
        let text = text.to_string();

        tokio::spawn(async move {
            match Self::fetch_audio(&synthesizer, &cache, &text).await {
                Ok(audio) => {
                    if let Err(e) = sink.play(audio).await {
                        error!("Playback failed: {}", e);
                    }
                }
                Err(e) => {
                    error!("Synthesis failed: {}", e);
                }
            }

            let mut state = state.lock();
            state.speaking = false;
            state.stopped_at = Some(Stopwatch::start());
        });
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().speaking
    }

    fn in_grace_period(&self) -> bool {
        let state = self.state.lock();
        if state.speaking {
            return false;
        }

        state
            .stopped_at
            .as_ref()
            .map(|since| since.elapsed() < self.grace_period)
            .unwrap_or(false)
    }
}
