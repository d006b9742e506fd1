//! Gameplay tuning
//!
//! Balance values for a round, loaded from JSON. Missing fields fall back to
//! the defaults below, and every loaded value is validated before a round can
//! use it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PHONE_CHARGE;
use crate::error::ConfigError;

/// Gameplay tuning for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Gate timer ===
    /// Shortest time (seconds) given to reach a newly assigned gate
    pub min_gate_timer: u32,
    /// Longest time (seconds) given to reach a newly assigned gate
    pub max_gate_timer: u32,

    // === Phone ===
    /// Charge (percent) the phone starts the round with
    pub initial_phone_charge: f32,
    /// Base drain in percent per second
    pub phone_charge_drain_rate: f32,
    /// Drain multiplier reached at full charge
    pub phone_charge_max_drain_rate_modifier: f32,
    /// Charge gained per second while at an outlet
    pub phone_charge_rate: f32,
    /// Charge at or below which the drain runs at its base rate
    pub normal_charge_constraint: f32,

    // === Score ===
    pub score_per_second: f32,

    // === Player ===
    /// Walking speed in world units per second
    pub move_speed: f32,
    /// Speed multiplier reached when the gate timer hits zero
    pub max_speed_modifier: f32,
    /// Gate timer (seconds) below which the player starts speeding up
    pub normal_speed_constraint: f32,

    // === Pacing (seconds) ===
    /// Delay between round start and the first gate pick
    pub first_gate_delay: f32,
    /// Delay between picking a gate and announcing it
    pub gate_settle_delay: f32,
    /// Delay between announcing a gate and starting its timer
    pub gate_timer_reset_delay: f32,
    /// Period of the decoy notification roll
    pub fake_notification_interval: f32,
    /// Probability that a decoy roll actually sends a decoy
    pub fake_notification_chance: f64,
    /// Delay between losing and showing the end screen
    pub end_screen_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_gate_timer: 20,
            max_gate_timer: 35,

            initial_phone_charge: 100.0,
            phone_charge_drain_rate: 1.0,
            phone_charge_max_drain_rate_modifier: 3.0,
            phone_charge_rate: 12.0,
            normal_charge_constraint: 50.0,

            score_per_second: 10.0,

            move_speed: 5.0,
            max_speed_modifier: 1.2,
            normal_speed_constraint: 10.0,

            first_gate_delay: 1.0,
            gate_settle_delay: 1.0,
            gate_timer_reset_delay: 2.0,
            fake_notification_interval: 8.0,
            fake_notification_chance: 0.5,
            end_screen_delay: 1.5,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check every value a round depends on
    ///
    /// The two constraints are divisors in the modifier curves, so a zero
    /// there is rejected here rather than showing up as NaN mid-round.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_gate_timer > self.max_gate_timer {
            return Err(ConfigError::invalid(
                "min_gate_timer",
                format!(
                    "{} is greater than max_gate_timer {}",
                    self.min_gate_timer, self.max_gate_timer
                ),
            ));
        }
        // A zero timer would be lost the moment it starts
        if self.min_gate_timer == 0 {
            return Err(ConfigError::invalid("min_gate_timer", "must be at least 1"));
        }

        check_range(
            "initial_phone_charge",
            self.initial_phone_charge,
            0.0,
            MAX_PHONE_CHARGE,
        )?;
        check_non_negative("phone_charge_drain_rate", self.phone_charge_drain_rate)?;
        check_modifier(
            "phone_charge_max_drain_rate_modifier",
            self.phone_charge_max_drain_rate_modifier,
        )?;
        check_non_negative("phone_charge_rate", self.phone_charge_rate)?;
        check_positive("normal_charge_constraint", self.normal_charge_constraint)?;
        if self.normal_charge_constraint >= MAX_PHONE_CHARGE {
            return Err(ConfigError::invalid(
                "normal_charge_constraint",
                format!("must be below {MAX_PHONE_CHARGE}"),
            ));
        }

        check_non_negative("score_per_second", self.score_per_second)?;

        check_positive("move_speed", self.move_speed)?;
        check_modifier("max_speed_modifier", self.max_speed_modifier)?;
        check_positive("normal_speed_constraint", self.normal_speed_constraint)?;

        check_non_negative("first_gate_delay", self.first_gate_delay)?;
        check_non_negative("gate_settle_delay", self.gate_settle_delay)?;
        check_non_negative("gate_timer_reset_delay", self.gate_timer_reset_delay)?;
        check_positive("fake_notification_interval", self.fake_notification_interval)?;
        if !(0.0..=1.0).contains(&self.fake_notification_chance) {
            return Err(ConfigError::invalid(
                "fake_notification_chance",
                format!("{} is outside [0, 1]", self.fake_notification_chance),
            ));
        }
        check_non_negative("end_screen_delay", self.end_screen_delay)?;

        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite number"))
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} is negative")));
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} must be above zero")));
    }
    Ok(())
}

fn check_modifier(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < 1.0 {
        return Err(ConfigError::invalid(field, format!("{value} is below 1")));
    }
    Ok(())
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::invalid(
            field,
            format!("{value} is outside [{min}, {max}]"),
        ));
    }
    Ok(())
}
