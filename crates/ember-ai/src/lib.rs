//! # Ember AI
//!
//! Finite-state AI controllers for Project Ember.
//!
//! This crate provides the decision layer for non-player actors:
//! - A generic, timer-driven state machine engine ([`AiController`])
//! - The combat policy for hostile monsters ([`MonsterPolicy`])
//! - The ambient policy for NPCs ([`NpcPolicy`])
//! - Owner capability traits the host game implements
//! - Cone-of-sight perception helpers
//! - State-change observers and an event bus
//!
//! The host calls [`AiController::update`] once per frame with the owning
//! actor and the frame delta. Decisions are throttled to `think_interval`
//! while movement runs every frame.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod config;
pub mod controller;
pub mod events;
pub mod mock;
pub mod monster;
pub mod npc;
pub mod perception;
pub mod state;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::events::*;
    pub use crate::monster::*;
    pub use crate::npc::*;
    pub use crate::perception::*;
    pub use crate::state::*;
}

pub use prelude::*;
