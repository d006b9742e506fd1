//! Last Call entry point
//!
//! Headless native demo: a scripted traveller plays one round through a small
//! terminal layout while the console stands in for the game's UI and audio.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use glam::Vec2;

    use last_call::audio::SoundEffect;
    use last_call::consts::FRAME_DT;
    use last_call::presentation::{
        AudioController, EndGameUi, GateNotifier, PhoneNotifier, Presentation,
    };
    use last_call::sim::{GameEvent, GateId, InputAxes, PeopleMover};
    use last_call::{Session, Tuning, Zone};

    #[derive(Parser, Debug)]
    #[command(name = "last-call")]
    #[command(about = "Play a headless round of Last Call with a scripted traveller")]
    pub struct Cli {
        /// Tuning JSON file; built-in defaults when omitted
        #[arg(long)]
        pub tuning: Option<PathBuf>,
        /// RNG seed; time-based when omitted
        #[arg(long)]
        pub seed: Option<u64>,
        /// Stop after this many seconds of simulated play
        #[arg(long, default_value_t = 300.0)]
        pub max_seconds: f32,
        /// Print the tuning in use as JSON and exit
        #[arg(long, default_value_t = false)]
        pub print_tuning: bool,
    }

    /// Stands in for the game's UI and audio
    struct ConsoleUi;

    impl GateNotifier for ConsoleUi {
        fn display_gate_notification(&mut self, flight_number: u32, gate_name: &str) {
            log::info!("[board] Flight {} now boarding at gate {}", flight_number, gate_name);
        }

        fn display_fake_gate_notification(&mut self, flight_number: u32, decoy_gate_name: &str) {
            log::info!("[board] Flight {} moved to gate {}?", flight_number, decoy_gate_name);
        }
    }

    impl PhoneNotifier for ConsoleUi {
        fn display_gate_message(&mut self, gate_name: &str) {
            log::info!("[phone] Your flight departs from gate {}", gate_name);
        }
    }

    impl EndGameUi for ConsoleUi {
        fn set_lose_message(&mut self, text: &str) {
            log::info!("[end] {}", text);
        }

        fn set_score_message(&mut self, time_survived: f32, score: f32) {
            log::info!("[end] Survived {:.1}s, score {:.0}", time_survived, score);
        }

        fn display_end_game_screen(&mut self) {
            log::info!("[end] Game over");
        }
    }

    impl AudioController for ConsoleUi {
        fn play(&mut self, sound: SoundEffect) {
            log::debug!("[audio] {:?}", sound);
        }

        fn set_soundtrack_pitch(&mut self, multiplier: f32) {
            log::debug!("[audio] soundtrack pitch {:.2}", multiplier);
        }
    }

    /// Trigger area of a zone
    enum Area {
        Circle { center: Vec2, radius: f32 },
        Rect { min: Vec2, max: Vec2 },
    }

    impl Area {
        fn contains(&self, p: Vec2) -> bool {
            match self {
                Area::Circle { center, radius } => p.distance(*center) <= *radius,
                Area::Rect { min, max } => p.cmpge(*min).all() && p.cmple(*max).all(),
            }
        }

        fn center(&self) -> Vec2 {
            match self {
                Area::Circle { center, .. } => *center,
                Area::Rect { min, max } => (*min + *max) / 2.0,
            }
        }
    }

    /// A corridor with A gates along the top, B gates along the bottom,
    /// outlets at both ends and a walkway each way down the middle
    struct Terminal {
        zones: Vec<(Area, Zone)>,
    }

    impl Terminal {
        fn new() -> Self {
            let mut zones = Vec::new();
            for (i, gate) in GateId::ALL.iter().enumerate() {
                let x = -30.0 + 20.0 * (i % 4) as f32;
                let y = if i < 4 { 20.0 } else { -20.0 };
                zones.push((
                    Area::Circle {
                        center: Vec2::new(x, y),
                        radius: 2.5,
                    },
                    Zone::Gate(*gate),
                ));
            }
            for x in [-45.0, 45.0] {
                zones.push((
                    Area::Circle {
                        center: Vec2::new(x, 0.0),
                        radius: 2.0,
                    },
                    Zone::Outlet,
                ));
            }
            zones.push((
                Area::Rect {
                    min: Vec2::new(-30.0, 4.0),
                    max: Vec2::new(30.0, 6.0),
                },
                Zone::PeopleMover(PeopleMover::new(Vec2::X, 1.8)),
            ));
            zones.push((
                Area::Rect {
                    min: Vec2::new(-30.0, -6.0),
                    max: Vec2::new(30.0, -4.0),
                },
                Zone::PeopleMover(PeopleMover::new(Vec2::NEG_X, 1.8)),
            ));
            Self { zones }
        }

        fn gate_position(&self, gate: GateId) -> Option<Vec2> {
            self.zones.iter().find_map(|(area, zone)| match zone {
                Zone::Gate(g) if *g == gate => Some(area.center()),
                _ => None,
            })
        }

        fn nearest_outlet(&self, from: Vec2) -> Option<Vec2> {
            self.zones
                .iter()
                .filter(|(_, zone)| matches!(zone, Zone::Outlet))
                .map(|(area, _)| area.center())
                .min_by(|a, b| a.distance(from).total_cmp(&b.distance(from)))
        }
    }

    /// Scripted player that trusts whatever gate it last heard about
    struct Traveller {
        pos: Vec2,
        believed_gate: Option<GateId>,
        touching: Vec<bool>,
    }

    impl Traveller {
        fn new(zone_count: usize) -> Self {
            Self {
                pos: Vec2::ZERO,
                believed_gate: None,
                touching: vec![false; zone_count],
            }
        }

        fn hear(&mut self, events: &[GameEvent]) {
            for event in events {
                match *event {
                    GameEvent::GateAssigned { gate, .. } => self.believed_gate = Some(gate),
                    GameEvent::FakeGateNotification { decoy, .. } => {
                        log::info!("Traveller heads for gate {} instead", decoy);
                        self.believed_gate = Some(decoy);
                    }
                    GameEvent::GateReached { .. } => self.believed_gate = None,
                    _ => {}
                }
            }
        }

        fn steer(&mut self, session: &Session, terminal: &Terminal) -> InputAxes {
            let round = session.round();
            let timer = round.gate_timer_seconds;

            let destination = if round.is_charging && round.phone_charge < 95.0 && timer > 15.0 {
                None
            } else if round.phone_charge < 30.0 && timer > 10.0 {
                terminal.nearest_outlet(self.pos)
            } else {
                self.believed_gate.and_then(|g| terminal.gate_position(g))
            };

            // Standing at a gate that turned out to be a decoy: check the board
            if let (Some(believed), Some(target)) = (self.believed_gate, round.target_gate) {
                let at_believed = terminal
                    .gate_position(believed)
                    .is_some_and(|p| p.distance(self.pos) < 1.0);
                if at_believed && believed != target && !round.target_gate_reached {
                    log::info!("Gate {} was a decoy, back to gate {}", believed, target);
                    self.believed_gate = Some(target);
                }
            }

            match destination {
                Some(to) if to.distance(self.pos) > 0.3 => {
                    let dir = (to - self.pos).normalize_or_zero();
                    InputAxes::new(dir.x, dir.y)
                }
                _ => InputAxes::default(),
            }
        }

        /// Report zones entered, held and left since the last frame
        fn update_contacts(&mut self, session: &mut Session, terminal: &Terminal) -> Vec<GameEvent> {
            let mut events = Vec::new();
            for (i, (area, zone)) in terminal.zones.iter().enumerate() {
                let inside = area.contains(self.pos);
                match (self.touching[i], inside) {
                    (false, true) => events.extend(session.zone_entered(*zone)),
                    (true, true) => session.zone_stayed(*zone),
                    (true, false) => events.extend(session.zone_exited(*zone)),
                    (false, false) => {}
                }
                self.touching[i] = inside;
            }
            events
        }
    }

    fn time_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run(cli: Cli) -> anyhow::Result<()> {
        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        if cli.print_tuning {
            println!("{}", serde_json::to_string_pretty(&tuning)?);
            return Ok(());
        }

        let seed = cli.seed.unwrap_or_else(time_seed);
        let presentation = Presentation::new()
            .with_gate_notifier(ConsoleUi)
            .with_phone(ConsoleUi)
            .with_end_game(ConsoleUi)
            .with_audio(ConsoleUi);
        let mut session = Session::new(tuning, seed)?.with_presentation(presentation);
        log::info!(
            "Seed {}, flight {}",
            seed,
            session.round().flight_number
        );

        let terminal = Terminal::new();
        let mut traveller = Traveller::new(terminal.zones.len());
        let events = session.start();
        traveller.hear(&events);

        let mut elapsed = 0.0;
        while elapsed < cli.max_seconds {
            let input = traveller.steer(&session, &terminal);
            let out = session.frame(input, FRAME_DT);
            traveller.pos += out.displacement;
            traveller.hear(&out.events);

            if let Some(ended) = out
                .events
                .iter()
                .find(|e| matches!(e, GameEvent::RoundEnded { .. }))
            {
                println!("{}", serde_json::to_string(ended)?);
                return Ok(());
            }

            let events = traveller.update_contacts(&mut session, &terminal);
            traveller.hear(&events);
            elapsed += FRAME_DT;
        }

        let round = session.round();
        log::info!(
            "Traveller still going after {:.0}s: score {:.0}, battery {:.0}%",
            cli.max_seconds,
            round.score,
            round.phone_charge
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Last Call (native) starting...");

    if let Err(err) = demo::run(demo::Cli::parse()) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host engine on the web; nothing to run here
}
