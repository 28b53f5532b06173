//! Capability interfaces an AI owner must provide.
//!
//! Controllers never own their actor. The owner is lent to each call and the
//! controller only reads attributes, moves the actor, and issues commands
//! through these traits.

use ember_common::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification of an actor, used to catch a policy bound to the
/// wrong kind of owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// Player-controlled character
    Player,
    /// Hostile combat actor
    Monster,
    /// Non-combat ambient character
    Npc,
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Player => "player",
            Self::Monster => "monster",
            Self::Npc => "npc",
        })
    }
}

/// Monster tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MonsterType {
    /// Regular monster
    #[default]
    Normal,
    /// Stronger variant
    Elite,
    /// Boss encounter, never flees
    Boss,
    /// Pack follower or summon
    Minion,
}

/// Snapshot of a perceived target, re-read every time it is needed so
/// movement tracks a moving target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Target entity
    pub id: EntityId,
    /// Current position
    pub position: Vec3,
    /// Whether the target is still alive
    pub alive: bool,
}

impl Target {
    /// Creates a live target snapshot.
    #[must_use]
    pub const fn new(id: EntityId, position: Vec3) -> Self {
        Self {
            id,
            position,
            alive: true,
        }
    }
}

/// Capabilities shared by every AI owner.
pub trait Actor {
    /// Entity this actor represents.
    fn id(&self) -> EntityId;
    /// Kind of actor.
    fn kind(&self) -> ActorKind;
    /// Whether the actor is alive. Dead owners suspend their controller.
    fn is_alive(&self) -> bool;
    /// Current position.
    fn position(&self) -> Vec3;
    /// Moves the actor.
    fn set_position(&mut self, position: Vec3);
    /// Current yaw in radians.
    fn facing(&self) -> f32;
    /// Sets yaw in radians.
    fn set_facing(&mut self, yaw: f32);
    /// Current move speed in units per second.
    fn move_speed(&self) -> f32;
    /// Reach of the actor's attack.
    fn attack_range(&self) -> f32;
    /// Current health.
    fn health(&self) -> f32;
    /// Maximum health.
    fn max_health(&self) -> f32;
    /// Halts any residual movement the actor owns.
    fn stop_moving(&mut self);

    /// Whether a stun-like status freezes the actor.
    fn is_stunned(&self) -> bool {
        false
    }

    /// Health as a fraction of maximum. Zero when maximum is not positive.
    fn health_fraction(&self) -> f32 {
        let max = self.max_health();
        if max > 0.0 {
            self.health() / max
        } else {
            0.0
        }
    }
}

/// Capabilities a hostile combat owner provides.
pub trait MonsterActor: Actor {
    /// Tier of this monster.
    fn monster_type(&self) -> MonsterType;
    /// Runs perception and returns the detected enemy, which also becomes
    /// the current target.
    fn detect_enemy(&mut self) -> Option<Target>;
    /// Live view of the current target, if any.
    fn current_target(&self) -> Option<Target>;
    /// Whether the actor has been dragged past its leash while chasing.
    fn is_chase_range_exceeded(&self) -> bool;
    /// Where the actor spawned.
    fn spawn_position(&self) -> Vec3;
    /// Configured patrol route.
    fn patrol_points(&self) -> &[Vec3];
    /// Advances the cyclic patrol cursor and returns the next point.
    fn next_patrol_point(&mut self) -> Option<Vec3>;
    /// Restores health, clamped by the actor to its maximum.
    fn heal(&mut self, amount: f32);
    /// Forgets the current target and any accumulated threat.
    fn clear_threat(&mut self);
    /// Performs an attack on `target`.
    fn attack(&mut self, target: EntityId);
}

/// Capabilities an ambient NPC owner provides.
pub trait NpcActor: Actor {
    /// Whether an interaction (dialogue, trade) is in progress.
    fn is_interacting(&self) -> bool;
}
