//! Round controller
//!
//! Owns the round, the player's motion state and the presentation
//! collaborators. The host forwards trigger-zone contacts and calls
//! [`Session::frame`] once per frame; the session moves the player, advances
//! the round and hands every resulting event to the collaborators.

use glam::Vec2;

use crate::error::ConfigError;
use crate::presentation::Presentation;
use crate::sim::{
    GameEvent, GateId, InputAxes, MotionStep, PeopleMover, PlayerMotion, RoundState, tick,
};
use crate::tuning::Tuning;

/// A trigger zone the player can touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    Outlet,
    Gate(GateId),
    PeopleMover(PeopleMover),
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// How far to move the player this frame
    pub displacement: Vec2,
    /// Movement details, absent while the round is not being played
    pub motion: Option<MotionStep>,
    /// Events emitted this frame, already dispatched to the collaborators
    pub events: Vec<GameEvent>,
}

pub struct Session {
    round: RoundState,
    motion: PlayerMotion,
    presentation: Presentation,
}

impl Session {
    /// Validate `tuning` and set up a round that has not started
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        let round = RoundState::new(tuning, seed)?;
        log::info!("New session with seed {}", seed);
        Ok(Self {
            round,
            motion: PlayerMotion::new(),
            presentation: Presentation::new(),
        })
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn motion(&self) -> &PlayerMotion {
        &self.motion
    }

    pub fn start(&mut self) -> Vec<GameEvent> {
        self.round.start_round();
        self.flush(Vec::new())
    }

    /// Player started touching `zone`
    pub fn zone_entered(&mut self, zone: Zone) -> Vec<GameEvent> {
        match zone {
            Zone::Outlet => self.round.on_outlet_enter(),
            Zone::Gate(gate) => {
                self.round.on_gate_zone_entered(gate);
            }
            Zone::PeopleMover(mover) => self.motion.enter_people_mover(mover),
        }
        self.flush(Vec::new())
    }

    /// Player is still touching `zone`
    pub fn zone_stayed(&mut self, zone: Zone) {
        if let Zone::PeopleMover(mover) = zone {
            self.motion.stay_on_people_mover(mover);
        }
    }

    /// Player stopped touching `zone`
    pub fn zone_exited(&mut self, zone: Zone) -> Vec<GameEvent> {
        match zone {
            Zone::Outlet => self.round.on_outlet_exit(),
            Zone::Gate(_) => {}
            Zone::PeopleMover(_) => self.motion.exit_people_mover(),
        }
        self.flush(Vec::new())
    }

    /// Run one host frame: move the player, then advance the round
    pub fn frame(&mut self, input: InputAxes, dt: f32) -> FrameOutput {
        let mut events = Vec::new();

        // Motion reads the timer as it stood before this frame's countdown
        let motion = if self.round.is_playing() {
            Some(self.motion.step(
                input,
                dt,
                self.round.gate_timer_seconds,
                &self.round.tuning,
                &mut events,
            ))
        } else {
            None
        };

        tick(&mut self.round, dt);

        FrameOutput {
            displacement: motion.map(|m| m.displacement).unwrap_or(Vec2::ZERO),
            motion,
            events: self.flush(events),
        }
    }

    fn flush(&mut self, mut events: Vec<GameEvent>) -> Vec<GameEvent> {
        events.extend(self.round.drain_events());
        self.presentation.dispatch(&events);
        events
    }
}
