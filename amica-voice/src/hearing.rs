//! Speech capture contract and the streaming-transcript adapter

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// The hearing contract the dialogue machine polls each tick.
///
/// `start_listening` clears any previously captured utterance before
/// enabling capture, so a stale phrase can never satisfy a new listening
/// cycle.
pub trait Hearing: Send {
    fn start_listening(&mut self);
    fn stop_listening(&mut self);
    fn is_listening(&self) -> bool;
    /// The most recent final transcript captured while listening, if any.
    fn last_utterance(&self) -> Option<String>;
}

#[derive(Default)]
struct HearingState {
    listening: bool,
    last: Option<String>,
}

/// Adapter over a streaming speech recognizer. The recognizer (out of scope)
/// delivers final transcripts on a channel; a background task stores each one
/// into the shared slot, but only while capture is enabled. Audio heard
/// while not listening is dropped, exactly like a muted microphone.
pub struct StreamHearing {
    state: Arc<Mutex<HearingState>>,
}

impl StreamHearing {
    pub fn new(mut transcripts: mpsc::Receiver<String>) -> Self {
        let state = Arc::new(Mutex::new(HearingState::default()));

        let slot = state.clone();
        tokio::spawn(async move {
            while let Some(text) = transcripts.recv().await {
                let mut state = slot.lock();
                if state.listening {
                    trace!(len = text.len(), "Transcript captured");
                    state.last = Some(text);
                } else {
                    trace!("Transcript dropped while not listening");
                }
            }
            debug!("Transcript stream closed");
        });

        Self { state }
    }
}

impl Hearing for StreamHearing {
    fn start_listening(&mut self) {
        let mut state = self.state.lock();
        if !state.listening {
            state.last = None;
            state.listening = true;
        }
    }

    fn stop_listening(&mut self) {
        self.state.lock().listening = false;
    }

    fn is_listening(&self) -> bool {
        self.state.lock().listening
    }

    fn last_utterance(&self) -> Option<String> {
        self.state.lock().last.clone()
    }
}
