//! amica-bot: wires the interaction core to scripted collaborators and runs
//! the tick loop

mod scripted;
mod settings;

use amica_brain::{EngagementMachine, Signal};
use amica_llm::{ChatCompletionProvider, LanguageModel};
use amica_sight::{DirectoryRegistry, IdentityRegistry, Perception, SightPipeline};
use amica_voice::{Speaker, StreamHearing};
use clap::Parser;
use settings::BotConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "amica-bot", about = "Social robot interaction loop")]
struct Args {
    /// Path to a toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Perception ticks per second
    #[arg(long, default_value_t = 10)]
    tick_hz: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    config.validate().map_err(anyhow::Error::msg)?;

    info!(persona = %config.persona.name, "Starting amica-bot");

    // Perception: scripted detectors walking a visitor through the frame
    let mut sight = SightPipeline::new(
        config.sight.clone(),
        Box::new(scripted::ScriptedBodies::new()),
        Box::new(scripted::ScriptedFaces::new(config.sight.frame)),
    );

    // Hearing: nothing feeds the transcript channel in the demo, so the
    // robot listens and times out the way it would in an empty room
    let (_transcripts, transcript_rx) = mpsc::channel::<String>(8);
    let hearing = StreamHearing::new(transcript_rx);

    let speaker = Speaker::new(
        &config.voice,
        Arc::new(scripted::SilentSynthesizer),
        Arc::new(scripted::ConsoleSink),
    );

    let provider = ChatCompletionProvider::new(config.language.clone(), config.persona.clone());
    if !provider.has_api_key() {
        warn!(
            env = %config.language.api_key_env,
            "No API key in the environment; response generation will fail and the robot will keep apologizing"
        );
    }
    let language: Arc<dyn LanguageModel> = Arc::new(provider);

    let mut registry = DirectoryRegistry::new(&config.faces_dir);

    let mut brain = EngagementMachine::new(
        config.brain.clone(),
        config.persona.clone(),
        Box::new(hearing),
        Box::new(speaker),
        language,
    );

    let tick = Duration::from_secs_f64(1.0 / f64::from(args.tick_hz.max(1)));
    let mut ticker = tokio::time::interval(tick);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            _ = ticker.tick() => {
                let observation = sight.observe();
                let update = brain.update(observation.person);

                if update.signal == Signal::ResetGaze {
                    debug!("Gaze reset requested");
                }

                if let Some(identity) = update.register {
                    if let Err(e) = registry.register_identity(&identity.name, &identity.face) {
                        warn!("Failed to register new identity: {}", e);
                    }
                }
            }
        }
    }

    Ok(())
}
