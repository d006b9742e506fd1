//! Delayed round actions
//!
//! Gate announcements, the 1 Hz gate countdown, decoy notifications and the
//! end screen all fire some time after they are requested. They are queued
//! here against the simulation clock and run by [`super::tick`] when due, so
//! the round keeps ticking (phone drain, score) while they wait.

use super::gate::GateId;
use super::state::LoseReason;

/// Slack when comparing fire times against an accumulated frame clock
const CLOCK_EPSILON: f32 = 1e-4;

/// A deferred round action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Decrement the gate timer; repeats every countdown period
    GateCountdown,
    /// Roll for a decoy gate notification; repeats every decoy interval
    FakeNotification,
    /// Pick the first target gate of the round
    AssignTarget,
    /// Announce a picked gate
    SettleTarget { generation: u32, gate: GateId },
    /// Start the announced gate's timer
    ResetGateTimer { generation: u32 },
    /// Hand the final results to the end screen
    AnnounceRoundEnd { reason: LoseReason },
}

/// An action waiting for its fire time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub fire_at: f32,
    pub action: Action,
    seq: u64,
}

/// Queue of pending actions ordered by fire time, then insertion order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    clock: f32,
    next_seq: u64,
    queue: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in seconds
    pub fn now(&self) -> f32 {
        self.clock
    }

    /// Move the clock forward
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.clock += dt;
        }
    }

    /// Queue `action` to fire `delay` seconds from now
    pub fn after(&mut self, delay: f32, action: Action) {
        self.at(self.clock + delay.max(0.0), action);
    }

    /// Queue `action` to fire at an absolute clock time
    pub fn at(&mut self, fire_at: f32, action: Action) {
        let seq = self.next_seq;
        self.next_seq += 1;
        // Equal fire times keep insertion order
        let idx = self.queue.partition_point(|s| s.fire_at <= fire_at);
        self.queue.insert(
            idx,
            Scheduled {
                fire_at,
                action,
                seq,
            },
        );
    }

    /// Remove and return the earliest action whose fire time has passed
    pub fn pop_due(&mut self) -> Option<Scheduled> {
        match self.queue.first() {
            Some(next) if next.fire_at <= self.clock + CLOCK_EPSILON => Some(self.queue.remove(0)),
            _ => None,
        }
    }

    /// Drop every pending action, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Drop pending actions matching `predicate`, returning how many were dropped
    pub fn cancel_matching(&mut self, predicate: impl Fn(&Action) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|s| !predicate(&s.action));
        before - self.queue.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending actions in firing order
    pub fn pending(&self) -> impl Iterator<Item = &Action> {
        self.queue.iter().map(|s| &s.action)
    }
}
