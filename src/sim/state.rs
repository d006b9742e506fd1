//! Round state and core simulation types
//!
//! Everything scoped to a single round lives in [`RoundState`]. A round is
//! created, started once, advanced by [`super::tick`], and frozen when it
//! ends; the next round gets a fresh state.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::gate::{GateId, pick_new_gate};
use super::schedule::{Action, Scheduler};
use crate::consts::*;
use crate::error::{ConfigError, GateError};
use crate::tuning::Tuning;

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Created, waiting for `start_round`
    NotStarted,
    /// Active gameplay
    Playing,
    /// Round lost; state is frozen
    Ended,
}

/// Progress toward the current target gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatePhase {
    /// No gate announced yet this round
    NoTarget,
    /// Gate announced, its timer has not started
    TargetPending,
    /// Gate timer is counting down
    TargetActive,
    /// Gate reached, the next one is being picked
    TargetReached,
}

/// Why a round was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoseReason {
    PhoneDied,
    MissedFlight,
}

impl LoseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoseReason::PhoneDied => "phone died",
            LoseReason::MissedFlight => "missed flight",
        }
    }

    /// Headline for the end screen
    pub fn lose_message(&self) -> &'static str {
        match self {
            LoseReason::PhoneDied => "Your phone died!",
            LoseReason::MissedFlight => "You missed your flight!",
        }
    }
}

impl std::fmt::Display for LoseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { flight_number: u32 },
    /// Player stepped into an outlet zone
    ChargingStarted,
    /// Player left an outlet zone
    ChargingStopped,
    GateReached { gate: GateId },
    /// A new target gate is live (gate board + phone message)
    GateAssigned { flight_number: u32, gate: GateId },
    /// The target gate's timer has started
    GateTimerReset { seconds: f32 },
    /// Misdirection: a notification pointing at a gate that is not the target
    FakeGateNotification { flight_number: u32, decoy: GateId },
    Lost { reason: LoseReason },
    /// Final results, delivered a short while after `Lost`
    RoundEnded {
        time_survived: f32,
        score: f32,
        reason: LoseReason,
    },
    /// Player reversed horizontal direction
    DirectionFlip,
    SoundtrackPitch { multiplier: f32 },
}

/// All mutable data for one round
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Balance values for this round
    pub tuning: Tuning,
    /// Seed the round RNG was created from
    pub seed: u64,
    pub phase: RoundPhase,
    pub gate_phase: GatePhase,
    /// Seconds left to reach the target gate
    pub gate_timer_seconds: f32,
    /// Battery percent, always within [0, 100]
    pub phone_charge: f32,
    pub is_charging: bool,
    pub score: f32,
    pub time_survived: f32,
    pub flight_number: u32,
    pub target_gate: Option<GateId>,
    pub target_gate_reached: bool,
    pub end_reason: Option<LoseReason>,
    pub(crate) rng: Pcg32,
    pub(crate) scheduler: Scheduler,
    /// Bumped on every pick so continuations from an older pick are ignored
    pub(crate) gate_generation: u32,
    /// Most recently picked gate, announced or not
    pub(crate) last_picked: Option<GateId>,
    pub(crate) events: Vec<GameEvent>,
}

impl RoundState {
    /// Create a round that has not started yet
    ///
    /// Fails on tuning that could not be played, before any randomness is drawn.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let flight_number = rng.random_range(FLIGHT_NUMBER_MIN..FLIGHT_NUMBER_MAX);
        let phone_charge = tuning.initial_phone_charge;

        Ok(Self {
            tuning,
            seed,
            phase: RoundPhase::NotStarted,
            gate_phase: GatePhase::NoTarget,
            gate_timer_seconds: GATE_TIMER_SENTINEL,
            phone_charge,
            is_charging: false,
            score: 0.0,
            time_survived: 0.0,
            flight_number,
            target_gate: None,
            target_gate_reached: false,
            end_reason: None,
            rng,
            scheduler: Scheduler::new(),
            gate_generation: 0,
            last_picked: None,
            events: Vec::new(),
        })
    }

    pub fn is_playing(&self) -> bool {
        self.phase == RoundPhase::Playing
    }

    /// Simulation clock in seconds since the round was created
    pub fn clock(&self) -> f32 {
        self.scheduler.now()
    }

    /// Actions waiting to fire, earliest first
    pub fn pending_actions(&self) -> impl Iterator<Item = &Action> {
        self.scheduler.pending()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    /// Begin play: queue the first gate pick, the gate countdown and the
    /// decoy notification roll
    ///
    /// Only a fresh round can start; later calls are ignored.
    pub fn start_round(&mut self) {
        if self.phase != RoundPhase::NotStarted {
            log::warn!("start_round ignored: round is {:?}", self.phase);
            return;
        }

        self.phase = RoundPhase::Playing;
        self.scheduler
            .after(self.tuning.first_gate_delay, Action::AssignTarget);
        self.scheduler
            .after(GATE_COUNTDOWN_PERIOD, Action::GateCountdown);
        self.scheduler.after(
            self.tuning.fake_notification_interval,
            Action::FakeNotification,
        );

        log::info!("Round started, flight {}", self.flight_number);
        self.emit(GameEvent::RoundStarted {
            flight_number: self.flight_number,
        });
        if self.is_charging {
            self.emit(GameEvent::ChargingStarted);
        }
    }

    /// Player is at an outlet
    ///
    /// Tracked in every phase so a player already plugged in when the round
    /// starts keeps charging; events are only sent during play.
    pub fn on_outlet_enter(&mut self) {
        if self.is_charging {
            return;
        }
        self.is_charging = true;
        if self.is_playing() {
            self.emit(GameEvent::ChargingStarted);
        }
    }

    pub fn on_outlet_exit(&mut self) {
        if !self.is_charging {
            return;
        }
        self.is_charging = false;
        if self.is_playing() {
            self.emit(GameEvent::ChargingStopped);
        }
    }

    /// Player walked into a gate zone; returns true if it was the target
    pub fn on_gate_zone_entered(&mut self, gate: GateId) -> bool {
        if !self.is_playing() || self.target_gate_reached || self.target_gate != Some(gate) {
            return false;
        }

        self.target_gate_reached = true;
        self.gate_phase = GatePhase::TargetReached;
        log::info!(
            "Reached gate {} with {:.0}s to spare",
            gate,
            self.gate_timer_seconds
        );
        self.emit(GameEvent::GateReached { gate });

        if let Err(err) = self.assign_new_target_gate() {
            log::error!("Could not pick the next gate: {}", err);
        }
        true
    }

    /// Pick the next target gate and queue its announcement
    ///
    /// The pick never repeats the previous one. The gate is announced after
    /// the settle delay and its timer starts after the reset delay.
    pub fn assign_new_target_gate(&mut self) -> Result<GateId, GateError> {
        let gate = pick_new_gate(&mut self.rng, &GateId::ALL, self.last_picked)?;
        self.last_picked = Some(gate);
        self.gate_generation += 1;

        log::debug!(
            "Picked gate {} (generation {})",
            gate,
            self.gate_generation
        );
        self.scheduler.after(
            self.tuning.gate_settle_delay,
            Action::SettleTarget {
                generation: self.gate_generation,
                gate,
            },
        );
        Ok(gate)
    }

    /// Lose the round for `reason`
    pub fn lose(&mut self, reason: LoseReason) {
        if !self.is_playing() {
            return;
        }
        self.emit(GameEvent::Lost { reason });
        self.end_round(reason);
    }

    /// Stop play, drop every pending action and queue the end screen
    pub fn end_round(&mut self, reason: LoseReason) {
        if !self.is_playing() {
            log::warn!("end_round ignored: round is {:?}", self.phase);
            return;
        }

        self.phase = RoundPhase::Ended;
        self.end_reason = Some(reason);
        let dropped = self.scheduler.cancel_all();
        self.scheduler.after(
            self.tuning.end_screen_delay,
            Action::AnnounceRoundEnd { reason },
        );

        log::info!(
            "Round over ({}): survived {:.1}s, score {:.0}, {} pending actions dropped",
            reason,
            self.time_survived,
            self.score,
            dropped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round() {
        let state = RoundState::new(Tuning::default(), 12345).unwrap();
        assert_eq!(state.phase, RoundPhase::NotStarted);
        assert_eq!(state.gate_phase, GatePhase::NoTarget);
        assert_eq!(state.gate_timer_seconds, GATE_TIMER_SENTINEL);
        assert_eq!(state.phone_charge, 100.0);
        assert!((FLIGHT_NUMBER_MIN..FLIGHT_NUMBER_MAX).contains(&state.flight_number));
        assert!(state.target_gate.is_none());
        assert!(state.pending_actions().next().is_none());
    }

    #[test]
    fn test_same_seed_same_flight() {
        let a = RoundState::new(Tuning::default(), 99).unwrap();
        let b = RoundState::new(Tuning::default(), 99).unwrap();
        assert_eq!(a.flight_number, b.flight_number);
    }

    #[test]
    fn test_start_queues_round_actions() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.start_round();
        assert!(state.is_playing());

        let pending: Vec<_> = state.pending_actions().copied().collect();
        assert!(pending.contains(&Action::AssignTarget));
        assert!(pending.contains(&Action::GateCountdown));
        assert!(pending.contains(&Action::FakeNotification));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::RoundStarted {
                flight_number: state.flight_number
            }]
        );
    }

    #[test]
    fn test_second_start_ignored() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.start_round();
        let queued = state.pending_actions().count();
        state.start_round();
        assert_eq!(state.pending_actions().count(), queued);
    }

    #[test]
    fn test_outlet_toggles_charging() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.start_round();
        state.drain_events();
        state.on_outlet_enter();
        state.on_outlet_enter();
        assert!(state.is_charging);
        state.on_outlet_exit();
        assert!(!state.is_charging);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ChargingStarted, GameEvent::ChargingStopped]
        );
    }

    #[test]
    fn test_wrong_gate_ignored() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.start_round();
        state.target_gate = Some(GateId::A1);
        assert!(!state.on_gate_zone_entered(GateId::B2));
        assert!(!state.target_gate_reached);
    }

    #[test]
    fn test_reaching_target_picks_next_gate() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.start_round();
        state.drain_events();
        state.target_gate = Some(GateId::A3);
        state.last_picked = Some(GateId::A3);

        assert!(state.on_gate_zone_entered(GateId::A3));
        assert!(state.target_gate_reached);
        assert_eq!(state.gate_phase, GatePhase::TargetReached);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::GateReached { gate: GateId::A3 }]
        );

        // Entering again does nothing until a new gate is announced
        assert!(!state.on_gate_zone_entered(GateId::A3));

        let settle = state.pending_actions().find_map(|a| match a {
            Action::SettleTarget { gate, .. } => Some(*gate),
            _ => None,
        });
        assert!(matches!(settle, Some(gate) if gate != GateId::A3));
    }

    #[test]
    fn test_end_round_cancels_pending() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.start_round();
        state.end_round(LoseReason::MissedFlight);

        assert_eq!(state.phase, RoundPhase::Ended);
        assert_eq!(state.end_reason, Some(LoseReason::MissedFlight));
        let pending: Vec<_> = state.pending_actions().copied().collect();
        assert_eq!(
            pending,
            vec![Action::AnnounceRoundEnd {
                reason: LoseReason::MissedFlight
            }]
        );
    }

    #[test]
    fn test_lose_emits_once() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.start_round();
        state.drain_events();
        state.lose(LoseReason::PhoneDied);
        state.lose(LoseReason::MissedFlight);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Lost {
                reason: LoseReason::PhoneDied
            }]
        );
        assert_eq!(state.end_reason, Some(LoseReason::PhoneDied));
    }

    #[test]
    fn test_plugged_in_before_start_keeps_charging() {
        let mut state = RoundState::new(Tuning::default(), 1).unwrap();
        state.on_outlet_enter();
        assert!(state.is_charging);
        assert!(state.drain_events().is_empty());

        state.start_round();
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::RoundStarted {
                    flight_number: state.flight_number
                },
                GameEvent::ChargingStarted,
            ]
        );

        state.phone_charge = 50.0;
        crate::sim::tick(&mut state, 0.5);
        assert!(state.phone_charge > 50.0);
    }

    #[test]
    fn test_unplayable_tuning_rejected() {
        let tuning = Tuning {
            min_gate_timer: 40,
            max_gate_timer: 30,
            ..Default::default()
        };
        assert!(matches!(
            RoundState::new(tuning, 1),
            Err(ConfigError::Invalid {
                field: "min_gate_timer",
                ..
            })
        ));

        let tuning = Tuning {
            fake_notification_chance: 1.5,
            ..Default::default()
        };
        assert!(RoundState::new(tuning, 1).is_err());
    }
}
