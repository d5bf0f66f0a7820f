use anyhow::{bail, Context};
use cosmic_tarot::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const CONFIG_ENV: &str = "COSMIC_TAROT_CONFIG";
const SEED_ENV: &str = "COSMIC_TAROT_SEED";

/// Headless reading: load images, deal and flip a row, then run the cosmic
/// shuffle and log what the cards say.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = load_options()?;
    let seed: u64 = match std::env::var(SEED_ENV) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{SEED_ENV} must be an unsigned integer"))?,
        Err(_) => rand::random(),
    };
    log::info!("reading with seed {seed}");

    let source = HttpContentSource::new(&options.content)?;
    let mut loader = ContentLoader::new(source, options.content.clone(), seed);
    let images = loader.load().await.context("could not load any card images")?;

    let scene = Rc::new(RefCell::new(SceneGraph::new()));
    let mut session = TarotSession::new(scene.clone(), options.clone(), seed)?;
    let mut player = Player::new(&options.frame);

    let dealt = session.deal(&images)?;
    player.play(&mut session, dealt).await?;
    for index in 0..session.cards().len() {
        let flipped = session.flip(index)?;
        player.play(&mut session, flipped).await?;
    }
    log::info!("dealt row: {}", describe(&session.reading()));

    let shuffled = session.cosmic_shuffle(&images)?;
    player.play(&mut session, shuffled).await?;

    log::info!(
        "cosmic shuffle done in {} frames, {} targets left on the table",
        player.driver.frames(),
        scene.borrow().len()
    );
    for (slot, image) in session.reading().iter().enumerate() {
        if let Some(image) = image {
            log::info!("slot {slot}: {} ({})", image.id, image.url);
        }
    }
    Ok(())
}

fn load_options() -> anyhow::Result<SessionOptions> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            let options = SessionOptions::from_json_str(&json)
                .with_context(|| format!("parsing config file {path}"))?;
            log::info!("using options from {path}");
            Ok(options)
        }
        Err(_) => Ok(SessionProfile::Balanced.resolve()),
    }
}

fn describe(reading: &[Option<ImageEntry>]) -> String {
    reading
        .iter()
        .map(|slot| slot.as_ref().map_or("-", |image| image.id.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drives a session from the wall clock at the configured frame rate
struct Player {
    driver: FrameDriver<InstantClock>,
    interval: tokio::time::Interval,
}

impl Player {
    fn new(frame: &FrameTimingConfig) -> Self {
        let period = Duration::from_millis(frame.target_frame_duration_ms().unwrap_or(16).max(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        Self {
            driver: FrameDriver::new(InstantClock::new(), frame.max_frame_delta_ms),
            interval,
        }
    }

    async fn play<S: SceneAdapter + 'static>(
        &mut self,
        session: &mut TarotSession<S>,
        signal: CompletionSignal,
    ) -> anyhow::Result<()> {
        log::debug!("playing {}", signal.label());
        while !signal.is_resolved() {
            self.interval.tick().await;
            self.driver.tick(session);
        }
        match signal.await {
            PhaseOutcome::Completed => Ok(()),
            PhaseOutcome::Failed(reason) => bail!("animation failed: {reason}"),
        }
    }
}
