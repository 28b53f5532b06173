//! AI states and transition records.

use ember_common::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an AI controller. Exactly one is active at any time.
///
/// There is no "dead" state: when the owner dies the controller is simply
/// suspended and keeps whatever state it was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AiState {
    /// Standing still
    #[default]
    Idle,
    /// Walking a patrol route
    Patrol,
    /// Pursuing the current target
    Chase,
    /// Attacking the current target
    Attack,
    /// Running away from the current target
    Flee,
    /// Walking back to spawn or home
    Return,
    /// Moving to a random nearby point
    Wander,
    /// Holding position until told otherwise
    Wait,
}

impl AiState {
    /// All states in declaration order.
    pub const ALL: [AiState; 8] = [
        AiState::Idle,
        AiState::Patrol,
        AiState::Chase,
        AiState::Attack,
        AiState::Flee,
        AiState::Return,
        AiState::Wander,
        AiState::Wait,
    ];

    /// Get display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Patrol => "Patrol",
            Self::Chase => "Chase",
            Self::Attack => "Attack",
            Self::Flee => "Flee",
            Self::Return => "Return",
            Self::Wander => "Wander",
            Self::Wait => "Wait",
        }
    }
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record of a completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Controller owner
    pub entity: EntityId,
    /// State that was left
    pub from: AiState,
    /// State that was entered
    pub to: AiState,
}

impl fmt::Display for StateTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.entity, self.from, self.to)
    }
}
