//! Per-frame round update
//!
//! Advances a [`RoundState`] by one host frame: due actions first, then the
//! phone battery, then the loss checks, then score. A loss detected in a
//! frame takes effect in that same frame.

use rand::Rng;

use super::curve::drain_modifier;
use super::gate::{GateId, pick_new_gate};
use super::schedule::Action;
use super::state::{GameEvent, GatePhase, LoseReason, RoundPhase, RoundState};
use crate::consts::*;

/// Advance the round by `dt` seconds
pub fn tick(state: &mut RoundState, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    match state.phase {
        RoundPhase::NotStarted => return,
        RoundPhase::Ended => {
            // Round data is frozen; only the end-screen announcement is left
            state.scheduler.advance(dt);
            run_due_actions(state);
            return;
        }
        RoundPhase::Playing => {}
    }

    state.scheduler.advance(dt);
    run_due_actions(state);
    if !state.is_playing() {
        return;
    }

    update_charge(state, dt);

    if state.phone_charge <= 0.0 {
        state.lose(LoseReason::PhoneDied);
        return;
    }
    if state.gate_timer_seconds <= 0.0 {
        state.lose(LoseReason::MissedFlight);
        return;
    }

    state.score += state.tuning.score_per_second * dt;
    state.time_survived += dt;
}

fn update_charge(state: &mut RoundState, dt: f32) {
    let tuning = &state.tuning;
    state.phone_charge = if state.is_charging {
        (state.phone_charge + tuning.phone_charge_rate * dt).min(MAX_PHONE_CHARGE)
    } else {
        let modifier = drain_modifier(
            state.phone_charge,
            tuning.phone_charge_max_drain_rate_modifier,
            tuning.normal_charge_constraint,
        );
        (state.phone_charge - tuning.phone_charge_drain_rate * modifier * dt).max(0.0)
    };
}

fn run_due_actions(state: &mut RoundState) {
    while let Some(due) = state.scheduler.pop_due() {
        run_action(state, due.action, due.fire_at);
    }
}

fn run_action(state: &mut RoundState, action: Action, fire_at: f32) {
    match action {
        Action::AnnounceRoundEnd { reason } => {
            state.emit(GameEvent::RoundEnded {
                time_survived: state.time_survived,
                score: state.score,
                reason,
            });
        }
        // Anything else left over from a finished round is stale
        _ if !state.is_playing() => {
            log::debug!("Dropping {:?}: round is not playing", action);
        }
        Action::GateCountdown => {
            if !state.target_gate_reached {
                state.gate_timer_seconds = (state.gate_timer_seconds - 1.0).max(0.0);
            }
            state
                .scheduler
                .at(fire_at + GATE_COUNTDOWN_PERIOD, Action::GateCountdown);
        }
        Action::FakeNotification => {
            roll_fake_notification(state);
            state.scheduler.at(
                fire_at + state.tuning.fake_notification_interval,
                Action::FakeNotification,
            );
        }
        Action::AssignTarget => {
            if let Err(err) = state.assign_new_target_gate() {
                log::error!("Could not pick the first gate: {}", err);
            }
        }
        Action::SettleTarget { generation, gate } => {
            if generation != state.gate_generation {
                log::debug!("Skipping stale announcement of gate {}", gate);
                return;
            }
            state.target_gate = Some(gate);
            state.target_gate_reached = false;
            state.gate_phase = GatePhase::TargetPending;

            log::info!("Flight {} now boarding at gate {}", state.flight_number, gate);
            state.emit(GameEvent::GateAssigned {
                flight_number: state.flight_number,
                gate,
            });
            state.scheduler.at(
                fire_at + state.tuning.gate_timer_reset_delay,
                Action::ResetGateTimer { generation },
            );
        }
        Action::ResetGateTimer { generation } => {
            if generation != state.gate_generation {
                log::debug!("Skipping stale gate timer reset");
                return;
            }
            let seconds = state
                .rng
                .random_range(state.tuning.min_gate_timer..=state.tuning.max_gate_timer)
                as f32;
            state.gate_timer_seconds = seconds;
            state.gate_phase = GatePhase::TargetActive;

            // Restart the countdown so the new gate gets whole seconds
            state
                .scheduler
                .cancel_matching(|a| matches!(a, Action::GateCountdown));
            state
                .scheduler
                .at(fire_at + GATE_COUNTDOWN_PERIOD, Action::GateCountdown);

            state.emit(GameEvent::GateTimerReset { seconds });
        }
    }
}

/// Maybe send a notification pointing at the wrong gate
fn roll_fake_notification(state: &mut RoundState) {
    if !state.rng.random_bool(state.tuning.fake_notification_chance) {
        return;
    }
    let Some(target) = state.target_gate else {
        return;
    };
    if state.target_gate_reached {
        return;
    }

    match pick_new_gate(&mut state.rng, &GateId::ALL, Some(target)) {
        Ok(decoy) => state.emit(GameEvent::FakeGateNotification {
            flight_number: state.flight_number,
            decoy,
        }),
        Err(err) => log::warn!("No decoy gate available: {}", err),
    }
}
