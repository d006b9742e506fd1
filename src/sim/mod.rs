//! Simulation module
//!
//! All gameplay rules live here. This module must stay engine-agnostic:
//! - Host supplies the frame delta; delayed effects run off the sim clock
//! - Seeded RNG only
//! - No rendering, physics or platform dependencies

pub mod curve;
pub mod gate;
pub mod motion;
pub mod schedule;
pub mod state;
pub mod tick;

pub use curve::{drain_modifier, linear_ramp, speed_modifier};
pub use gate::{GateId, pick_new_gate};
pub use motion::{InputAxes, MotionStep, PeopleMover, PlayerMotion, compute_step};
pub use schedule::{Action, Scheduler};
pub use state::{GameEvent, GatePhase, LoseReason, RoundPhase, RoundState};
pub use tick::tick;
