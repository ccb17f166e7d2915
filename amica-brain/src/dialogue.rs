//! One conversational exchange: listen, wait for the response, recover

use crate::config::BrainConfig;
use amica_core::{ConversationLog, Speaker, Stopwatch};
use amica_llm::LanguageModel;
use amica_voice::Hearing;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Dialogue turn states. Closed set so transition handling is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Listening,
    WaitingForResponse,
    HearingTimedOut,
    ResponseTimedOut,
    Completed,
}

/// What one poll of the turn machine tells the caller.
#[derive(Debug, PartialEq)]
pub enum TurnEvent {
    Pending,
    /// Nothing was heard within the listening window. The caller apologizes
    /// and the machine re-enters Listening on the next poll.
    HearingTimedOut,
    /// No accepted response arrived within the window.
    ResponseTimedOut,
    /// The exchange finished. The response text is surfaced exactly once;
    /// `None` means the generation call failed and there is nothing to say.
    Completed(Option<String>),
}

/// Where the spawned response task and the polling tick meet. The id
/// comparison and the reply write happen under this one mutex, so a
/// completion that lost the race can never clobber a newer request's slot.
struct ReplySlot {
    current_id: u64,
    reply: Option<Option<String>>,
}

/// Manages one utterance-response exchange, driven purely by external polls.
///
/// Response generation is fire-and-forget: dispatching installs a fresh
/// request id in the slot, and starting a new Listening cycle is the only way
/// to retire an outstanding request. A stale task's completion finds its id
/// superseded and is discarded without touching state.
pub struct DialogueTurnMachine {
    state: TurnState,
    log: ConversationLog,
    slot: Arc<Mutex<ReplySlot>>,
    // Monotonic; ids never repeat, so a stale completion can never collide
    // with a current request.
    next_request_id: u64,
    watch: Stopwatch,
    listen_timeout: Duration,
    response_timeout: Duration,
}

impl DialogueTurnMachine {
    pub fn new(config: &BrainConfig) -> Self {
        Self {
            state: TurnState::Idle,
            log: ConversationLog::new(),
            slot: Arc::new(Mutex::new(ReplySlot {
                current_id: 0,
                reply: None,
            })),
            next_request_id: 1,
            watch: Stopwatch::start(),
            listen_timeout: config.listen_timeout(),
            response_timeout: config.response_timeout(),
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Record a turn into the transcript. The engagement layer uses this for
    /// what the robot says.
    pub fn record(&mut self, speaker: Speaker, text: &str) {
        self.log.record(speaker, text);
    }

    /// Drop the last logged (unanswered) turn; the apology path.
    pub fn discard_last_turn(&mut self) {
        self.log.drop_last();
    }

    /// Advance the exchange by one tick.
    pub fn poll(
        &mut self,
        hearing: &mut dyn Hearing,
        language: &Arc<dyn LanguageModel>,
    ) -> TurnEvent {
        match self.state {
            TurnState::Idle
            | TurnState::Completed
            | TurnState::HearingTimedOut
            | TurnState::ResponseTimedOut => {
                // start_listening clears any previously captured utterance
                hearing.start_listening();
                self.state = TurnState::Listening;
                self.watch.restart();
                TurnEvent::Pending
            }

            TurnState::Listening => {
                match hearing.last_utterance().filter(|u| !u.is_empty()) {
                    Some(utterance) => {
                        info!(%utterance, "Heard the human");
                        hearing.stop_listening();
                        self.log.record(Speaker::Human, &utterance);
                        self.dispatch_response(language);
                        self.state = TurnState::WaitingForResponse;
                        self.watch.restart();
                        TurnEvent::Pending
                    }
                    None => {
                        if self.watch.elapsed() >= self.listen_timeout {
                            warn!("Nothing heard within the listening window");
                            self.state = TurnState::HearingTimedOut;
                            TurnEvent::HearingTimedOut
                        } else {
                            TurnEvent::Pending
                        }
                    }
                }
            }

            TurnState::WaitingForResponse => {
                let reply = self.slot.lock().reply.take();
                match reply {
                    Some(reply) => {
                        self.state = TurnState::Completed;
                        TurnEvent::Completed(reply)
                    }
                    None => {
                        if self.watch.elapsed() >= self.response_timeout {
                            warn!("No response within the window");
                            self.state = TurnState::ResponseTimedOut;
                            TurnEvent::ResponseTimedOut
                        } else {
                            TurnEvent::Pending
                        }
                    }
                }
            }
        }
    }

    /// Kick off response generation off the tick thread. Installing the new
    /// id retires whatever request was outstanding; its eventual completion
    /// will find itself stale.
    fn dispatch_response(&mut self, language: &Arc<dyn LanguageModel>) {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        {
            let mut slot = self.slot.lock();
            slot.current_id = request_id;
            slot.reply = None;
        }

        let lines = self.log.lines();
        let slot = self.slot.clone();
        let language = language.clone();

        tokio::spawn(async move {
            let result = match language.converse(&lines).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Response generation failed: {}", e);
                    None
                }
            };

            let mut slot = slot.lock();
            if slot.current_id == request_id {
                slot.reply = Some(result);
            } else {
                debug!(request_id, "Stale response discarded");
            }
        });
    }

    /// Abandon the exchange and the transcript: stop capturing, clear the
    /// log, kill any in-flight response, back to Idle. Used when the
    /// conversation partner is lost.
    pub fn reset(&mut self, hearing: &mut dyn Hearing) {
        hearing.stop_listening();
        self.log.clear();

        let mut slot = self.slot.lock();
        slot.current_id = 0;
        slot.reply = None;
        drop(slot);

        self.state = TurnState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amica_llm::{LanguageError, Result as LlmResult};
    use async_trait::async_trait;

    /// Hearing fake scripted from the test body.
    #[derive(Default)]
    struct ScriptedHearing {
        listening: bool,
        utterance: Option<String>,
        start_calls: usize,
        stop_calls: usize,
    }

    impl Hearing for ScriptedHearing {
        fn start_listening(&mut self) {
            if !self.listening {
                self.utterance = None;
                self.listening = true;
            }
            self.start_calls += 1;
        }

        fn stop_listening(&mut self) {
            self.listening = false;
            self.stop_calls += 1;
        }

        fn is_listening(&self) -> bool {
            self.listening
        }

        fn last_utterance(&self) -> Option<String> {
            self.utterance.clone()
        }
    }

    /// Replies with "re: <last human line>" after a per-call delay taken
    /// from the front of `delays`.
    struct SlowLanguage {
        delays: Mutex<Vec<Duration>>,
    }

    impl SlowLanguage {
        fn new(delays: Vec<Duration>) -> Arc<dyn LanguageModel> {
            Arc::new(Self {
                delays: Mutex::new(delays),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for SlowLanguage {
        async fn converse(&self, lines: &[String]) -> LlmResult<String> {
            let delay = self.delays.lock().remove(0);
            tokio::time::sleep(delay).await;
            let last = lines.last().cloned().unwrap_or_default();
            Ok(format!("re: {}", last.replace("Human: ", "")))
        }

        async fn extract_name(&self, _lines: &[String]) -> LlmResult<Option<String>> {
            Err(LanguageError::InvalidResponse("not used".to_string()))
        }
    }

    fn machine() -> DialogueTurnMachine {
        DialogueTurnMachine::new(&BrainConfig::default())
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_enters_listening() {
        let mut hearing = ScriptedHearing::default();
        let language = SlowLanguage::new(vec![]);
        let mut machine = machine();

        assert_eq!(machine.poll(&mut hearing, &language), TurnEvent::Pending);
        assert_eq!(machine.state(), TurnState::Listening);
        assert!(hearing.is_listening());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hearing_timeout_fires_exactly_at_boundary() {
        let mut hearing = ScriptedHearing::default();
        let language = SlowLanguage::new(vec![]);
        let mut machine = machine();

        machine.poll(&mut hearing, &language);

        tokio::time::advance(Duration::from_millis(14_999)).await;
        assert_eq!(machine.poll(&mut hearing, &language), TurnEvent::Pending);
        assert_eq!(machine.state(), TurnState::Listening);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(
            machine.poll(&mut hearing, &language),
            TurnEvent::HearingTimedOut
        );
        assert_eq!(machine.state(), TurnState::HearingTimedOut);

        // Next poll starts over
        assert_eq!(machine.poll(&mut hearing, &language), TurnEvent::Pending);
        assert_eq!(machine.state(), TurnState::Listening);
    }

    #[tokio::test(start_paused = true)]
    async fn test_utterance_dispatches_and_completes() {
        let mut hearing = ScriptedHearing::default();
        let language = SlowLanguage::new(vec![Duration::from_secs(1)]);
        let mut machine = machine();

        machine.poll(&mut hearing, &language);
        hearing.utterance = Some("hello robot".to_string());

        assert_eq!(machine.poll(&mut hearing, &language), TurnEvent::Pending);
        assert_eq!(machine.state(), TurnState::WaitingForResponse);
        assert!(!hearing.is_listening());
        assert_eq!(machine.log().lines(), vec!["Human: hello robot"]);

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;

        assert_eq!(
            machine.poll(&mut hearing, &language),
            TurnEvent::Completed(Some("re: hello robot".to_string()))
        );
        assert_eq!(machine.state(), TurnState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_utterance_does_not_dispatch() {
        let mut hearing = ScriptedHearing::default();
        let language = SlowLanguage::new(vec![]);
        let mut machine = machine();

        machine.poll(&mut hearing, &language);
        hearing.utterance = Some(String::new());

        assert_eq!(machine.poll(&mut hearing, &language), TurnEvent::Pending);
        assert_eq!(machine.state(), TurnState::Listening);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let mut hearing = ScriptedHearing::default();
        // First call takes 10s (will be abandoned), second takes 1s
        let language =
            SlowLanguage::new(vec![Duration::from_secs(10), Duration::from_secs(1)]);
        let mut machine = machine();

        // First exchange: heard, dispatched, then the response times out
        machine.poll(&mut hearing, &language);
        hearing.utterance = Some("first".to_string());
        machine.poll(&mut hearing, &language);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(
            machine.poll(&mut hearing, &language),
            TurnEvent::ResponseTimedOut
        );

        // Second exchange dispatched while the first is still in flight
        machine.poll(&mut hearing, &language);
        hearing.utterance = Some("second".to_string());
        machine.poll(&mut hearing, &language);

        // Second response lands
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;

        // First response lands afterwards and must be ignored
        tokio::time::advance(Duration::from_secs(4)).await;
        settle().await;

        assert_eq!(
            machine.poll(&mut hearing, &language),
            TurnEvent::Completed(Some("re: second".to_string()))
        );

        // Nothing left over from the stale completion
        machine.poll(&mut hearing, &language);
        assert_eq!(machine.state(), TurnState::Listening);
        assert!(machine.slot.lock().reply.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_timeout_boundary() {
        let mut hearing = ScriptedHearing::default();
        let language = SlowLanguage::new(vec![Duration::from_secs(60)]);
        let mut machine = machine();

        machine.poll(&mut hearing, &language);
        hearing.utterance = Some("hello".to_string());
        machine.poll(&mut hearing, &language);

        tokio::time::advance(Duration::from_millis(4_999)).await;
        assert_eq!(machine.poll(&mut hearing, &language), TurnEvent::Pending);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(
            machine.poll(&mut hearing, &language),
            TurnEvent::ResponseTimedOut
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_log_and_kills_in_flight_request() {
        let mut hearing = ScriptedHearing::default();
        let language = SlowLanguage::new(vec![Duration::from_secs(2)]);
        let mut machine = machine();

        machine.poll(&mut hearing, &language);
        hearing.utterance = Some("hello".to_string());
        machine.poll(&mut hearing, &language);

        machine.reset(&mut hearing);
        assert_eq!(machine.state(), TurnState::Idle);
        assert!(machine.log().is_empty());
        assert!(!hearing.is_listening());

        // The in-flight response completes after the reset and must land
        // nowhere
        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(machine.slot.lock().reply.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_last_turn() {
        let mut machine = machine();
        machine.record(Speaker::Robot, "Hi!");
        machine.record(Speaker::Human, "unanswered");

        machine.discard_last_turn();
        assert_eq!(machine.log().lines(), vec!["AI: Hi!"]);
    }
}
