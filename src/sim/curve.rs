//! Piecewise-linear modifier curves
//!
//! Both the battery drain and the player's urgency speed-up are flat at 1 on
//! one side of a knee and ramp linearly to a maximum at the far end.

use crate::consts::MAX_PHONE_CHARGE;

/// Linear ramp from 1 at `knee` to `max_modifier` at `full`, flat at 1 on the
/// other side of `knee`
///
/// `full` may lie on either side of `knee`. Callers guarantee `knee != full`
/// (see [`crate::Tuning::validate`]).
#[inline]
pub fn linear_ramp(value: f32, knee: f32, full: f32, max_modifier: f32) -> f32 {
    let span = full - knee;
    if (value - knee) * span.signum() <= 0.0 {
        return 1.0;
    }
    (max_modifier - 1.0) / span * (value - knee) + 1.0
}

/// Battery drain multiplier for the current charge
///
/// Drain runs at its base rate up to `normal_constraint` and speeds up toward
/// full charge, reaching `max_modifier` at 100%.
#[inline]
pub fn drain_modifier(charge: f32, max_modifier: f32, normal_constraint: f32) -> f32 {
    linear_ramp(charge, normal_constraint, MAX_PHONE_CHARGE, max_modifier)
}

/// Movement speed multiplier for the time left on the gate timer
///
/// Normal speed above `normal_constraint` seconds, ramping up to
/// `max_modifier` as the timer reaches zero.
#[inline]
pub fn speed_modifier(gate_timer: f32, max_modifier: f32, normal_constraint: f32) -> f32 {
    linear_ramp(gate_timer, normal_constraint, 0.0, max_modifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_drain_modifier_table() {
        assert!((drain_modifier(50.0, 5.0, 50.0) - 1.0).abs() < EPS);
        assert!((drain_modifier(100.0, 5.0, 50.0) - 5.0).abs() < EPS);
        assert!((drain_modifier(75.0, 5.0, 50.0) - 3.0).abs() < EPS);
        assert_eq!(drain_modifier(10.0, 5.0, 50.0), 1.0);
        assert_eq!(drain_modifier(0.0, 5.0, 50.0), 1.0);
    }

    #[test]
    fn test_speed_modifier_table() {
        assert!((speed_modifier(10.0, 1.2, 10.0) - 1.0).abs() < EPS);
        assert!((speed_modifier(0.0, 1.2, 10.0) - 1.2).abs() < EPS);
        assert_eq!(speed_modifier(15.0, 1.2, 10.0), 1.0);
        assert!((speed_modifier(5.0, 1.2, 10.0) - 1.1).abs() < EPS);
    }

    #[test]
    fn test_flat_curve_when_max_is_one() {
        assert_eq!(drain_modifier(90.0, 1.0, 50.0), 1.0);
        assert_eq!(speed_modifier(2.0, 1.0, 10.0), 1.0);
    }

    proptest! {
        #[test]
        fn drain_modifier_stays_between_one_and_max(
            charge in 0.0f32..=100.0,
            max in 1.0f32..10.0,
            knee in 1.0f32..99.0,
        ) {
            let m = drain_modifier(charge, max, knee);
            prop_assert!(m >= 1.0 - EPS);
            prop_assert!(m <= max + EPS);
        }

        #[test]
        fn speed_modifier_grows_as_timer_falls(
            a in 0.0f32..30.0,
            b in 0.0f32..30.0,
            max in 1.0f32..2.0,
        ) {
            let (low, high) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(speed_modifier(low, max, 10.0) >= speed_modifier(high, max, 10.0) - EPS);
        }
    }
}
