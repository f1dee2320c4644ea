//! Gelato Bounce entry point
//!
//! Native builds run a headless session: a seeded "player" draws springboards
//! under the falling mascot and the revealed words are logged. The browser
//! build is driven from JS through `platform::web::WebGelato`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::ExitCode;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use gelato_bounce::consts::FRAME_MS;
    use gelato_bounce::feedback::{AudioCue, FeedbackOutput, FeedbackRouter, HapticPattern};
    use gelato_bounce::schedule::{DateKey, ScheduleStore, load_scheduled_message};
    use gelato_bounce::sim::{GameEvent, ReadyOutcome};
    use gelato_bounce::speech::{AudioCatalog, SpeechGenerator};
    use gelato_bounce::{GelatoWorld, LoadError, SimConfig, SpeechError};

    /// Simulated session length
    const SESSION_FRAMES: u32 = 60 * 60;
    const DEMO_MESSAGE: &str = "Good morning sunshine, every bounce brings a brand new word";

    /// Logs feedback instead of vibrating
    struct LogOutput;

    impl FeedbackOutput for LogOutput {
        fn haptic(&mut self, pattern: HapticPattern) {
            log::trace!("haptic {pattern:?}");
        }

        fn cue(&mut self, cue: AudioCue, volume: f32) {
            log::trace!("cue {cue:?} at {volume:.2}");
        }
    }

    /// Stands in for the text-to-speech service
    struct LocalVoice;

    impl SpeechGenerator for LocalVoice {
        fn generate(&mut self, words: &[String]) -> Result<Vec<(String, String)>, SpeechError> {
            Ok(words.iter().map(|w| (w.clone(), format!("tts://{w}"))).collect())
        }
    }

    struct Args {
        config: Option<String>,
        schedule: Option<(String, String)>,
        seed: u64,
    }

    fn parse_args() -> Args {
        let mut args = Args {
            config: None,
            schedule: None,
            seed: 12345,
        };
        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--config" => args.config = it.next(),
                "--schedule" => {
                    if let (Some(path), Some(date)) = (it.next(), it.next()) {
                        args.schedule = Some((path, date));
                    }
                }
                "--seed" => {
                    if let Some(seed) = it.next().and_then(|s| s.parse().ok()) {
                        args.seed = seed;
                    }
                }
                other => log::warn!("Ignoring unknown argument {other}"),
            }
        }
        args
    }

    fn load_message(world: &mut GelatoWorld, schedule: Option<&(String, String)>) -> Result<usize, LoadError> {
        match schedule {
            Some((path, date)) => {
                let date: DateKey = date.parse()?;
                let store = ScheduleStore::load_file(path)?;
                load_scheduled_message(world, &store, date)
            }
            None => world.set_message(DEMO_MESSAGE),
        }
    }

    pub fn run() -> ExitCode {
        gelato_bounce::platform::init_logging();
        let args = parse_args();

        let config = match args.config.as_deref().map(SimConfig::load) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                log::error!("Bad config: {err}");
                return ExitCode::FAILURE;
            }
            None => SimConfig::default(),
        };

        let mut world = GelatoWorld::new(config);
        let ready = world.message_ready();
        if let Err(err) = load_message(&mut world, args.schedule.as_ref()) {
            // The session still runs, just without words
            log::warn!("Message unavailable: {err}");
        }

        let mut catalog = AudioCatalog::new();
        catalog.on_ready(|fresh| log::debug!("Audio ready: {}", fresh.join(" ")));
        if let Some(ReadyOutcome::Ready { word_count }) = ready.outcome() {
            log::info!("Preloading audio for {word_count} words");
            if let Err(err) = catalog.preload(&mut LocalVoice, world.words()) {
                log::warn!("Audio preload failed: {err}");
            }
        }

        let mut rng = Pcg32::seed_from_u64(args.seed);
        let mut router = FeedbackRouter::new(LogOutput);
        let mut revealed = Vec::new();

        for _ in 0..SESSION_FRAMES {
            // Player draws a board under the mascot while it falls
            if world.springboard().is_none() && world.mascot_velocity_y() > 200.0 {
                let pos = world.mascot_position();
                let below = pos.y + rng.random_range(60.0..140.0);
                let half = rng.random_range(40.0..90.0);
                let tilt = rng.random_range(-25.0..25.0);
                world.create_springboard(pos.x - half, below - tilt, pos.x + half, below + tilt);
            }

            world.step(FRAME_MS);

            for event in world.pending_events() {
                if let GameEvent::QualifyingBounce { word: Some(word), .. } = event {
                    let audio = catalog.locator(&word.word).unwrap_or("(silent)");
                    log::info!("[{:>7.0}ms] {} {}", word.revealed_at, word.word, audio);
                    revealed.push(word.word.clone());
                }
            }
            world.dispatch_events(&mut router);

            // Resting on the ground: toss the mascot back in
            if world.springboard().is_none() && world.mascot_velocity().length() < 1.0 {
                world.respawn_mascot();
            }
        }

        let end = world.mascot_position();
        log::info!(
            "Session over after {:.1}s: {} words revealed, mascot at ({:.0}, {:.0})",
            world.now_ms() / 1000.0,
            revealed.len(),
            end.x,
            end.y
        );
        println!("{}", revealed.join(" "));
        world.destroy();
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the WebGelato binding, this is just to satisfy the compiler
}
