//! The top-level engagement machine: Idle, Engaging, Conversing

use crate::config::BrainConfig;
use crate::dialogue::{DialogueTurnMachine, TurnEvent};
use amica_core::{FaceImage, Person, Persona, Speaker, Stopwatch};
use amica_llm::LanguageModel;
use amica_voice::{Hearing, SpeechOutput};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

const APOLOGY_NOT_HEARD: &str =
    "Sorry, I didn't hear you. Do you want to say or ask me about anything?";
const APOLOGY_NO_THOUGHTS: &str =
    "Sorry, my brain has some issue gathering some thoughts. Would you please say that again?";

/// Engagement states. Owned exclusively by the machine and mutated only by
/// `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementState {
    Idle,
    Engaging,
    Conversing,
}

/// Side-effect request for the surrounding control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    None,
    /// Nobody in sight; the head should return to its rest pose.
    ResetGaze,
}

/// A face the robot learned a name for during the conversation and wants
/// registered.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub name: String,
    pub face: FaceImage,
}

/// What one tick of the machine hands back to the control loop.
#[derive(Debug)]
pub struct BrainUpdate {
    pub signal: Signal,
    pub register: Option<NewIdentity>,
}

struct ExtractionSlot {
    outstanding: bool,
    found: Option<NewIdentity>,
}

/// The top-level state machine. One `update` per perception tick; it never
/// blocks. A `DialogueTurnMachine` exists exactly while Conversing and owns
/// the transcript, so losing the partner drops the whole conversation with
/// it.
pub struct EngagementMachine {
    config: BrainConfig,
    persona: Persona,
    state: EngagementState,
    engaged: Option<Person>,
    /// Any known identity sighted at any point in this engagement. Its
    /// presence suppresses new-face registration at the end.
    known_name: Option<String>,
    engage_watch: Stopwatch,
    disengage_watch: Option<Stopwatch>,
    turn: Option<DialogueTurnMachine>,
    hearing: Box<dyn Hearing>,
    speech: Box<dyn SpeechOutput>,
    language: Arc<dyn LanguageModel>,
    extraction: Arc<Mutex<ExtractionSlot>>,
}

impl EngagementMachine {
    pub fn new(
        config: BrainConfig,
        persona: Persona,
        hearing: Box<dyn Hearing>,
        speech: Box<dyn SpeechOutput>,
        language: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            config,
            persona,
            state: EngagementState::Idle,
            engaged: None,
            known_name: None,
            engage_watch: Stopwatch::start(),
            disengage_watch: None,
            turn: None,
            hearing,
            speech,
            language,
            extraction: Arc::new(Mutex::new(ExtractionSlot {
                outstanding: false,
                found: None,
            })),
        }
    }

    pub fn state(&self) -> EngagementState {
        self.state
    }

    pub fn engaged(&self) -> Option<&Person> {
        self.engaged.as_ref()
    }

    /// The dialogue machine, present iff the state is Conversing.
    pub fn dialogue(&self) -> Option<&DialogueTurnMachine> {
        self.turn.as_ref()
    }

    /// Advance the interaction by one perception tick.
    pub fn update(&mut self, person: Option<Person>) -> BrainUpdate {
        let mut signal = Signal::None;

        match self.state {
            EngagementState::Idle => {
                if let Some(person) = person {
                    info!("Person spotted, engaging");
                    self.engaged = Some(person);
                    self.engage_watch.restart();
                    self.disengage_watch = None;
                    self.state = EngagementState::Engaging;
                } else {
                    signal = Signal::ResetGaze;
                }
            }

            EngagementState::Engaging => {
                self.merge_engaged(person.as_ref());

                let face_engaged = self
                    .engaged
                    .as_ref()
                    .map(|p| p.face_detected)
                    .unwrap_or(false);

                if face_engaged && self.engage_watch.elapsed() > self.config.converse_threshold() {
                    self.start_conversation();
                }
            }

            EngagementState::Conversing => {
                self.merge_engaged(person.as_ref());

                // Speaking and listening are mutually exclusive: while the
                // robot talks (or the room still echoes it), the dialogue
                // machine is not driven at all.
                if !self.speech.is_speaking() && !self.speech.in_grace_period() {
                    if self.check_disengaged(person.as_ref()) {
                        info!("Disengaged, nobody in sight");
                        self.request_name_extraction();
                        self.reset();
                    } else {
                        self.drive_turn();
                    }
                }
            }
        }

        BrainUpdate {
            signal,
            register: self.take_extracted_identity(),
        }
    }

    /// Fold this tick's observation into the engaged person. A face-detected
    /// snapshot beats a faceless one; among face-detected snapshots, a known
    /// identity beats an unknown. Any sighted identity name is remembered
    /// for the registration decision at the end of the conversation.
    fn merge_engaged(&mut self, person: Option<&Person>) {
        let Some(person) = person else { return };

        if let Some(engaged) = self.engaged.as_mut() {
            if !engaged.face_detected && person.face_detected {
                *engaged = person.clone();
            } else if engaged.face_detected
                && person.face_detected
                && engaged.name.is_none()
                && person.name.is_some()
            {
                *engaged = person.clone();
            }
        }

        if let Some(name) = &person.name {
            self.known_name = Some(name.clone());
        }
    }

    /// Rolling disengagement clock: any observed person restarts it, even
    /// one the merge rules go on to ignore. Only with nobody in sight for
    /// the full window is the partner considered gone.
    fn check_disengaged(&mut self, person: Option<&Person>) -> bool {
        match person {
            Some(_) => {
                self.disengage_watch = Some(Stopwatch::start());
                false
            }
            None => {
                let watch = self.disengage_watch.get_or_insert_with(Stopwatch::start);
                watch.elapsed() >= self.config.disengage_timeout()
            }
        }
    }

    fn start_conversation(&mut self) {
        info!("Starting a conversation");
        self.state = EngagementState::Conversing;
        self.turn = Some(DialogueTurnMachine::new(&self.config));

        let greeting = match self.engaged.as_ref().and_then(|p| p.name.clone()) {
            Some(name) => format!(
                "Hi {}. It's good to see you. What do you want to talk about today?",
                name
            ),
            None => format!(
                "Hi there! My name is {}. Do you want to chat with me? You can ask me about anything",
                self.persona.name
            ),
        };

        self.speak(&greeting, true);
    }

    /// Say something. Capture stops first so the robot does not transcribe
    /// itself; `record` keeps apologies out of the transcript.
    fn speak(&mut self, text: &str, record: bool) {
        self.hearing.stop_listening();
        self.speech.say(text);

        if record {
            if let Some(turn) = self.turn.as_mut() {
                turn.record(Speaker::Robot, text);
            }
        }
    }

    fn drive_turn(&mut self) {
        let Some(mut turn) = self.turn.take() else {
            return;
        };
        let event = turn.poll(self.hearing.as_mut(), &self.language);
        self.turn = Some(turn);

        match event {
            TurnEvent::Pending => {}
            TurnEvent::HearingTimedOut => {
                if let Some(turn) = self.turn.as_mut() {
                    turn.discard_last_turn();
                }
                self.speak(APOLOGY_NOT_HEARD, false);
            }
            TurnEvent::ResponseTimedOut => {
                if let Some(turn) = self.turn.as_mut() {
                    turn.discard_last_turn();
                }
                self.speak(APOLOGY_NO_THOUGHTS, false);
            }
            TurnEvent::Completed(Some(reply)) if !reply.is_empty() => {
                self.speak(&reply, true);
            }
            TurnEvent::Completed(_) => {
                // Failed or empty generation: nothing worth saying
                debug!("Empty response, staying quiet");
            }
        }
    }

    /// Decide, at disengagement, whether this conversation taught us a new
    /// face. All gates must pass: the partner stayed unnamed, a face image
    /// was captured, no known identity was sighted at any point, the face
    /// was close enough to be worth registering, and the conversation had
    /// real substance. Extraction runs off the tick thread; the result is
    /// picked up by a later update.
    fn request_name_extraction(&mut self) {
        let Some(person) = self.engaged.as_ref() else {
            return;
        };
        if person.name.is_some() || self.known_name.is_some() {
            return;
        }
        let Some(face) = person.face_image.clone() else {
            return;
        };
        let Some(face_bbox) = person.face_bbox else {
            return;
        };

        let min_width = self.config.frame.width * self.config.min_registration_face_fraction;
        let min_height = self.config.frame.height * self.config.min_registration_face_fraction;
        if face_bbox.width() < min_width || face_bbox.height() < min_height {
            debug!("Face too small to register");
            return;
        }

        let Some(turn) = self.turn.as_ref() else {
            return;
        };
        if turn.log().len() <= self.config.min_exchanges_to_register {
            debug!("Conversation too short to attempt name extraction");
            return;
        }

        {
            let mut slot = self.extraction.lock();
            if slot.outstanding {
                return;
            }
            slot.outstanding = true;
        }

        info!("Trying to learn the partner's name from the conversation");
        let lines = turn.log().lines();
        let language = self.language.clone();
        let slot = self.extraction.clone();

        tokio::spawn(async move {
            let name = match language.extract_name(&lines).await {
                Ok(name) => name,
                Err(e) => {
                    warn!("Name extraction failed: {}", e);
                    None
                }
            };

            let mut slot = slot.lock();
            slot.outstanding = false;
            if let Some(name) = name {
                info!(%name, "Learned a new name");
                slot.found = Some(NewIdentity { name, face });
            }
        });
    }

    fn take_extracted_identity(&mut self) -> Option<NewIdentity> {
        self.extraction.lock().found.take()
    }

    /// Forget the engagement: back to Idle, partner and transcript gone.
    fn reset(&mut self) {
        self.state = EngagementState::Idle;
        self.engaged = None;
        self.known_name = None;
        self.disengage_watch = None;

        if let Some(mut turn) = self.turn.take() {
            turn.reset(self.hearing.as_mut());
        }
    }
}
