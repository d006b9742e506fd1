//! Boarding gates
//!
//! The terminal has eight gates. A new target is always drawn uniformly from
//! the gates other than the previous one, by rejection sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_GATE_DRAWS;
use crate::error::GateError;

/// A boarding gate zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateId {
    A1,
    A2,
    A3,
    A4,
    B1,
    B2,
    B3,
    B4,
}

impl GateId {
    /// Every gate in the terminal
    pub const ALL: [GateId; 8] = [
        GateId::A1,
        GateId::A2,
        GateId::A3,
        GateId::A4,
        GateId::B1,
        GateId::B2,
        GateId::B3,
        GateId::B4,
    ];

    /// Display name shown on notifications
    pub fn name(&self) -> &'static str {
        match self {
            GateId::A1 => "A1",
            GateId::A2 => "A2",
            GateId::A3 => "A3",
            GateId::A4 => "A4",
            GateId::B1 => "B1",
            GateId::B2 => "B2",
            GateId::B3 => "B3",
            GateId::B4 => "B4",
        }
    }
}

impl std::fmt::Display for GateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Draw a gate from `gates` that differs from `current`
///
/// With no current gate any member may be drawn. Retries are capped at
/// [`MAX_GATE_DRAWS`].
pub fn pick_new_gate<R: Rng>(
    rng: &mut R,
    gates: &[GateId],
    current: Option<GateId>,
) -> Result<GateId, GateError> {
    if gates.len() < 2 {
        return Err(GateError::TooFewGates(gates.len()));
    }

    for _ in 0..MAX_GATE_DRAWS {
        let gate = gates[rng.random_range(0..gates.len())];
        if Some(gate) != current {
            return Ok(gate);
        }
    }
    Err(GateError::Exhausted(MAX_GATE_DRAWS))
}
