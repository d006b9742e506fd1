//! Player movement
//!
//! Turns input axes into a per-frame displacement. The player walks at
//! `move_speed`, speeds up as the gate timer runs out, and is pushed along
//! (or held back) by people-movers. The caller owns the player's position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::curve::speed_modifier;
use super::state::GameEvent;
use crate::audio::{PITCH_EPSILON, is_boosted, soundtrack_pitch};
use crate::sign;
use crate::tuning::Tuning;

/// Input axes sampled for one frame, each nominally in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputAxes {
    pub horizontal: f32,
    pub vertical: f32,
}

impl InputAxes {
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.horizontal, self.vertical)
    }
}

/// A moving walkway
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeopleMover {
    /// Direction the walkway carries people (unit length)
    pub push: Vec2,
    /// Speed multiplier when walking with the walkway
    pub modifier: f32,
}

impl PeopleMover {
    pub fn new(push: Vec2, modifier: f32) -> Self {
        Self {
            push: push.normalize_or_zero(),
            modifier,
        }
    }

    /// Per-axis speed multipliers for a player heading along `heading`
    ///
    /// Walking with the push gets the full modifier, walking against it gets
    /// `1 / (modifier * 2)`. Axes the walkway or the player do not move along
    /// are left alone.
    pub fn axis_multipliers(&self, heading: Vec2) -> Vec2 {
        if !self.modifier.is_finite() || self.modifier <= 0.0 {
            return Vec2::ONE;
        }
        Vec2::new(
            axis_multiplier(self.push.x, heading.x, self.modifier),
            axis_multiplier(self.push.y, heading.y, self.modifier),
        )
    }
}

fn axis_multiplier(push: f32, heading: f32, modifier: f32) -> f32 {
    let alignment = sign(push) * sign(heading);
    if alignment > 0.0 {
        modifier
    } else if alignment < 0.0 {
        1.0 / (modifier * 2.0)
    } else {
        1.0
    }
}

/// Result of one movement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    /// Position change for this frame
    pub displacement: Vec2,
    /// Normalized input direction (zero when idle)
    pub heading: Vec2,
    /// Speed in world units per second
    pub speed: f32,
    /// Urgency multiplier from the gate timer
    pub speed_modifier: f32,
    /// Moving faster than walking speed (trail effect on)
    pub boosted: bool,
}

/// Compute one movement step without touching any facing state
pub fn compute_step(
    input: InputAxes,
    dt: f32,
    gate_timer: f32,
    terrain: Option<&PeopleMover>,
    tuning: &Tuning,
) -> MotionStep {
    let heading = input.as_vec2().normalize_or_zero();
    let modifier = speed_modifier(
        gate_timer.max(0.0),
        tuning.max_speed_modifier,
        tuning.normal_speed_constraint,
    );
    let terrain_multipliers = terrain
        .map(|mover| mover.axis_multipliers(heading))
        .unwrap_or(Vec2::ONE);

    let velocity = heading * tuning.move_speed * modifier * terrain_multipliers;
    let speed = velocity.length();

    MotionStep {
        displacement: velocity * dt.max(0.0),
        heading,
        speed,
        speed_modifier: modifier,
        boosted: is_boosted(speed, tuning.move_speed),
    }
}

/// Per-player movement state carried between frames
#[derive(Debug, Clone)]
pub struct PlayerMotion {
    /// Last non-zero horizontal direction (-1 or 1)
    previous_horizontal: f32,
    /// Walkway currently under the player
    people_mover: Option<PeopleMover>,
    /// Last soundtrack pitch reported
    soundtrack_pitch: f32,
}

impl Default for PlayerMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerMotion {
    pub fn new() -> Self {
        Self {
            // Sprites start facing left
            previous_horizontal: -1.0,
            people_mover: None,
            soundtrack_pitch: 1.0,
        }
    }

    pub fn facing(&self) -> f32 {
        self.previous_horizontal
    }

    pub fn people_mover(&self) -> Option<&PeopleMover> {
        self.people_mover.as_ref()
    }

    pub fn soundtrack_pitch(&self) -> f32 {
        self.soundtrack_pitch
    }

    pub fn enter_people_mover(&mut self, mover: PeopleMover) {
        self.people_mover = Some(mover);
    }

    /// Refresh the walkway while the player stays on it
    pub fn stay_on_people_mover(&mut self, mover: PeopleMover) {
        self.people_mover = Some(mover);
    }

    pub fn exit_people_mover(&mut self) {
        self.people_mover = None;
    }

    /// Advance one frame, pushing direction and pitch changes onto `events`
    pub fn step(
        &mut self,
        input: InputAxes,
        dt: f32,
        gate_timer: f32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> MotionStep {
        let step = compute_step(input, dt, gate_timer, self.people_mover.as_ref(), tuning);

        let horizontal = sign(step.heading.x);
        if horizontal * self.previous_horizontal < 0.0 {
            events.push(GameEvent::DirectionFlip);
        }
        if horizontal != 0.0 {
            self.previous_horizontal = horizontal;
        }

        let pitch = soundtrack_pitch(step.speed, tuning.move_speed);
        let back_to_normal = pitch == 1.0 && self.soundtrack_pitch != 1.0;
        if back_to_normal || (pitch - self.soundtrack_pitch).abs() >= PITCH_EPSILON {
            self.soundtrack_pitch = pitch;
            events.push(GameEvent::SoundtrackPitch { multiplier: pitch });
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;
    const CALM: f32 = 30.0;

    fn tuning() -> Tuning {
        Tuning {
            move_speed: 5.0,
            max_speed_modifier: 1.2,
            normal_speed_constraint: 10.0,
            ..Default::default()
        }
    }

    fn flips(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::DirectionFlip))
            .count()
    }

    #[test]
    fn test_idle_input_is_zero() {
        let step = compute_step(InputAxes::default(), DT, CALM, None, &tuning());
        assert_eq!(step.displacement, Vec2::ZERO);
        assert_eq!(step.speed, 0.0);
        assert!(!step.boosted);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let step = compute_step(InputAxes::new(1.0, 1.0), 1.0, CALM, None, &tuning());
        assert!((step.speed - 5.0).abs() < 1e-4);
        assert!((step.displacement.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_urgency_speeds_up_player() {
        let step = compute_step(InputAxes::new(1.0, 0.0), 1.0, 0.0, None, &tuning());
        assert!((step.speed_modifier - 1.2).abs() < 1e-5);
        assert!((step.displacement.x - 6.0).abs() < 1e-4);
        assert!(step.boosted);

        let step = compute_step(InputAxes::new(1.0, 0.0), 1.0, 15.0, None, &tuning());
        assert_eq!(step.speed_modifier, 1.0);
    }

    #[test]
    fn test_people_mover_with_and_against() {
        let mover = PeopleMover::new(Vec2::new(1.0, 0.0), 2.0);

        let with = compute_step(InputAxes::new(1.0, 0.0), 1.0, CALM, Some(&mover), &tuning());
        assert!((with.displacement.x - 10.0).abs() < 1e-4);

        // Against the walkway: 1 / (2 * 2) = 0.25
        let against = compute_step(InputAxes::new(-1.0, 0.0), 1.0, CALM, Some(&mover), &tuning());
        assert!((against.displacement.x + 1.25).abs() < 1e-4);

        // Crossing the walkway is unaffected
        let across = compute_step(InputAxes::new(0.0, 1.0), 1.0, CALM, Some(&mover), &tuning());
        assert!((across.displacement.y - 5.0).abs() < 1e-4);
        assert_eq!(across.displacement.x, 0.0);
    }

    #[test]
    fn test_degenerate_mover_is_inert() {
        let mover = PeopleMover::new(Vec2::new(0.0, 1.0), 0.0);
        assert_eq!(mover.axis_multipliers(Vec2::new(0.0, 1.0)), Vec2::ONE);
    }

    #[test]
    fn test_single_flip_on_reversal() {
        let mut motion = PlayerMotion::new();
        let mut events = Vec::new();
        motion.step(InputAxes::new(1.0, 0.0), DT, CALM, &tuning(), &mut events);
        events.clear();

        motion.step(InputAxes::new(-1.0, 0.0), DT, CALM, &tuning(), &mut events);
        assert_eq!(flips(&events), 1);
        assert_eq!(motion.facing(), -1.0);
    }

    #[test]
    fn test_vertical_movement_keeps_facing() {
        let mut motion = PlayerMotion::new();
        let mut events = Vec::new();
        motion.step(InputAxes::new(1.0, 0.0), DT, CALM, &tuning(), &mut events);
        motion.step(InputAxes::new(0.0, 1.0), DT, CALM, &tuning(), &mut events);
        motion.step(InputAxes::new(0.0, -1.0), DT, CALM, &tuning(), &mut events);
        motion.step(InputAxes::default(), DT, CALM, &tuning(), &mut events);
        assert_eq!(motion.facing(), 1.0);

        events.clear();
        motion.step(InputAxes::new(1.0, 1.0), DT, CALM, &tuning(), &mut events);
        assert_eq!(flips(&events), 0);
    }

    #[test]
    fn test_pitch_reported_on_change_only() {
        let mut motion = PlayerMotion::new();
        let mut events = Vec::new();
        // Already facing left, so no flip gets mixed in
        let left = InputAxes::new(-1.0, 0.0);

        motion.step(left, DT, CALM, &tuning(), &mut events);
        assert!(events.is_empty());

        motion.step(left, DT, 0.0, &tuning(), &mut events);
        motion.step(left, DT, 0.0, &tuning(), &mut events);
        let pitches: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::SoundtrackPitch { multiplier } => Some(*multiplier),
                _ => None,
            })
            .collect();
        assert_eq!(pitches.len(), 1);
        assert!((pitches[0] - 1.1).abs() < 1e-4);

        events.clear();
        motion.step(left, DT, CALM, &tuning(), &mut events);
        assert_eq!(events, vec![GameEvent::SoundtrackPitch { multiplier: 1.0 }]);
    }

    #[test]
    fn test_people_mover_enter_exit() {
        let mut motion = PlayerMotion::new();
        let mover = PeopleMover::new(Vec2::new(0.0, 3.0), 1.5);
        motion.enter_people_mover(mover);
        assert_eq!(motion.people_mover().map(|m| m.push), Some(Vec2::new(0.0, 1.0)));
        motion.exit_people_mover();
        assert!(motion.people_mover().is_none());
    }
}
