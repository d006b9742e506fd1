//! Audio cues
//!
//! Playback belongs to the host engine. The simulation only names the cues it
//! wants and decides how far the soundtrack is pitched up while the player
//! is running faster than walking speed.

use serde::{Deserialize, Serialize};

use crate::consts::BOOST_THRESHOLD;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Phone plugged in at an outlet
    PhoneCharging,
    /// Player reached the target gate
    GateReached,
    /// A gate notification arrived (real or decoy)
    Notification,
    /// Round lost
    GameOver,
}

/// Soundtrack pitch changes smaller than this are not reported
pub const PITCH_EPSILON: f32 = 0.01;

/// Whether `speed` counts as boosted above the base `move_speed`
#[inline]
pub fn is_boosted(speed: f32, move_speed: f32) -> bool {
    speed > move_speed + BOOST_THRESHOLD
}

/// Soundtrack pitch multiplier for the player's current speed
///
/// Half of the relative speed-up is applied to the pitch; at or near walking
/// speed the pitch stays at 1.
pub fn soundtrack_pitch(speed: f32, move_speed: f32) -> f32 {
    if move_speed <= 0.0 || !is_boosted(speed, move_speed) {
        return 1.0;
    }
    1.0 + (speed / move_speed - 1.0) / 2.0
}
