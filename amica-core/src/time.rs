//! Elapsed-time measurement for the polled state machines

use std::time::Duration;
use tokio::time::Instant;

/// Restartable stopwatch. The state machines never run timers of their own;
/// every timeout is a stopwatch reset at a transition point and read on later
/// polls.
///
/// Backed by the tokio clock, so tests running under a paused runtime can
/// advance time deterministically.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn restart(&mut self) {
        self.started = Instant::now();
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_tracks_advanced_time() {
        let watch = Stopwatch::start();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(watch.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_elapsed() {
        let mut watch = Stopwatch::start();
        tokio::time::advance(Duration::from_secs(5)).await;
        watch.restart();
        assert!(watch.elapsed() < Duration::from_millis(1));
    }
}
