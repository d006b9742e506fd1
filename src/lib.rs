//! Last Call - race through the airport before your flight leaves
//!
//! Core modules:
//! - `sim`: Simulation core (round state, player motion, gate scheduling)
//! - `session`: Round controller wiring the simulation to collaborators
//! - `presentation`: Collaborator traits consumed by the host engine
//! - `audio`: Sound identifiers and soundtrack pitch
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod presentation;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, GateError};
pub use session::{FrameOutput, Session, Zone};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Phone battery capacity (percent)
    pub const MAX_PHONE_CHARGE: f32 = 100.0;

    /// Gate timer value shown before the first gate is assigned
    pub const GATE_TIMER_SENTINEL: f32 = 99.0;
    /// Gate timer countdown period (seconds of sim time per decrement)
    pub const GATE_COUNTDOWN_PERIOD: f32 = 1.0;

    /// Flight numbers are drawn from this half-open range
    pub const FLIGHT_NUMBER_MIN: u32 = 1000;
    pub const FLIGHT_NUMBER_MAX: u32 = 10000;

    /// Rejection sampling cap when picking a new target gate
    pub const MAX_GATE_DRAWS: u32 = 64;

    /// Speed above `move_speed` at which the player counts as boosted
    pub const BOOST_THRESHOLD: f32 = 0.1;

    /// Typical host frame step, used by the demo binary
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Sign of a float as -1, 0 or 1 (zero stays zero, unlike `f32::signum`)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
