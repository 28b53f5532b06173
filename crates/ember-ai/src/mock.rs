//! In-memory actor for tests and tooling.

use crate::actor::{Actor, ActorKind, MonsterActor, MonsterType, NpcActor, Target};
use ember_common::EntityId;
use glam::Vec3;

/// Mock actor implementing every owner capability with plain fields.
///
/// Commands are recorded so tests can assert on what a policy asked for.
#[derive(Debug, Clone)]
pub struct MockActor {
    /// Entity id
    pub id: EntityId,
    /// Reported kind
    pub kind: ActorKind,
    /// Alive flag
    pub alive: bool,
    /// Position
    pub position: Vec3,
    /// Yaw in radians
    pub facing: f32,
    /// Move speed
    pub move_speed: f32,
    /// Attack reach
    pub attack_range: f32,
    /// Current health
    pub health: f32,
    /// Maximum health
    pub max_health: f32,
    /// Stun flag
    pub stunned: bool,
    /// Interaction flag (NPCs)
    pub interacting: bool,
    /// Monster tier
    pub monster_type: MonsterType,
    /// Spawn point
    pub spawn_position: Vec3,
    /// Patrol route
    pub patrol_points: Vec<Vec3>,
    /// Index of the next patrol point to hand out
    pub patrol_cursor: usize,
    /// What perception finds on the next `detect_enemy`
    pub detectable: Option<Target>,
    /// Current target
    pub target: Option<Target>,
    /// Leash flag
    pub chase_range_exceeded: bool,
    /// Number of `next_patrol_point` calls
    pub patrol_requests: usize,
    /// Number of `stop_moving` calls
    pub stop_requests: usize,
    /// Number of `clear_threat` calls
    pub threat_clears: usize,
    /// Targets attacked, in order
    pub attacks: Vec<EntityId>,
    /// Heal amounts requested, in order
    pub heals: Vec<f32>,
}

impl MockActor {
    fn new(kind: ActorKind, position: Vec3) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            alive: true,
            position,
            facing: 0.0,
            move_speed: 3.0,
            attack_range: 2.0,
            health: 100.0,
            max_health: 100.0,
            stunned: false,
            interacting: false,
            monster_type: MonsterType::Normal,
            spawn_position: position,
            patrol_points: Vec::new(),
            patrol_cursor: 0,
            detectable: None,
            target: None,
            chase_range_exceeded: false,
            patrol_requests: 0,
            stop_requests: 0,
            threat_clears: 0,
            attacks: Vec::new(),
            heals: Vec::new(),
        }
    }

    /// Creates a monster standing at its spawn point.
    #[must_use]
    pub fn monster(position: Vec3) -> Self {
        Self::new(ActorKind::Monster, position)
    }

    /// Creates an NPC standing at `position`.
    #[must_use]
    pub fn npc(position: Vec3) -> Self {
        Self::new(ActorKind::Npc, position)
    }

    /// Sets the patrol route.
    #[must_use]
    pub fn with_patrol(mut self, points: Vec<Vec3>) -> Self {
        self.patrol_points = points;
        self
    }

    /// Sets the monster tier.
    #[must_use]
    pub fn with_type(mut self, monster_type: MonsterType) -> Self {
        self.monster_type = monster_type;
        self
    }

    /// Sets current and maximum health.
    #[must_use]
    pub fn with_health(mut self, health: f32, max_health: f32) -> Self {
        self.health = health;
        self.max_health = max_health;
        self
    }

    /// Places an enemy where perception will find it.
    pub fn spot(&mut self, enemy: Target) {
        self.detectable = Some(enemy);
    }

    /// Removes the enemy from perception and forgets it as a target.
    pub fn lose_sight(&mut self) {
        self.detectable = None;
        self.target = None;
    }

    /// Moves the detectable enemy and the current target together.
    pub fn move_enemy(&mut self, position: Vec3) {
        if let Some(t) = self.detectable.as_mut() {
            t.position = position;
        }
        if let Some(t) = self.target.as_mut() {
            t.position = position;
        }
    }
}

impl Actor for MockActor {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> ActorKind {
        self.kind
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn facing(&self) -> f32 {
        self.facing
    }

    fn set_facing(&mut self, yaw: f32) {
        self.facing = yaw;
    }

    fn move_speed(&self) -> f32 {
        self.move_speed
    }

    fn attack_range(&self) -> f32 {
        self.attack_range
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn stop_moving(&mut self) {
        self.stop_requests += 1;
    }

    fn is_stunned(&self) -> bool {
        self.stunned
    }
}

impl MonsterActor for MockActor {
    fn monster_type(&self) -> MonsterType {
        self.monster_type
    }

    fn detect_enemy(&mut self) -> Option<Target> {
        if let Some(enemy) = self.detectable {
            self.target = Some(enemy);
        }
        self.detectable
    }

    fn current_target(&self) -> Option<Target> {
        self.target
    }

    fn is_chase_range_exceeded(&self) -> bool {
        self.chase_range_exceeded
    }

    fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    fn patrol_points(&self) -> &[Vec3] {
        &self.patrol_points
    }

    fn next_patrol_point(&mut self) -> Option<Vec3> {
        if self.patrol_points.is_empty() {
            return None;
        }
        self.patrol_requests += 1;
        let point = self.patrol_points[self.patrol_cursor % self.patrol_points.len()];
        self.patrol_cursor = (self.patrol_cursor + 1) % self.patrol_points.len();
        Some(point)
    }

    fn heal(&mut self, amount: f32) {
        self.heals.push(amount);
        self.health = (self.health + amount).min(self.max_health);
    }

    fn clear_threat(&mut self) {
        self.threat_clears += 1;
        self.target = None;
        self.detectable = None;
    }

    fn attack(&mut self, target: EntityId) {
        self.attacks.push(target);
    }
}

impl NpcActor for MockActor {
    fn is_interacting(&self) -> bool {
        self.interacting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_points_cycle() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(2.0, 0.0, 0.0);
        let mut actor = MockActor::monster(Vec3::ZERO).with_patrol(vec![a, b]);
        assert_eq!(actor.next_patrol_point(), Some(a));
        assert_eq!(actor.next_patrol_point(), Some(b));
        assert_eq!(actor.next_patrol_point(), Some(a));
        assert_eq!(actor.patrol_requests, 3);
    }

    #[test]
    fn test_heal_clamps() {
        let mut actor = MockActor::monster(Vec3::ZERO).with_health(80.0, 100.0);
        actor.heal(50.0);
        assert_eq!(actor.health, 100.0);
    }

    #[test]
    fn test_detect_sets_target() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        let enemy = Target::new(EntityId::from_raw(7), Vec3::X);
        actor.spot(enemy);
        assert_eq!(actor.detect_enemy(), Some(enemy));
        assert_eq!(actor.current_target(), Some(enemy));
        actor.clear_threat();
        assert_eq!(actor.current_target(), None);
        assert_eq!(actor.detect_enemy(), None);
    }
}
