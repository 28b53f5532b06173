//! Combat policy for hostile monsters.
//!
//! Cycle: idle/patrol → chase → attack → flee/return. Decisions come from
//! the throttled `think` pass; movement and attacks run every frame.
//!
//! | From | Condition (in priority order) | To |
//! |---|---|---|
//! | Idle, Patrol, Wander | enemy detected | Chase |
//! | Chase | target lost or chase range exceeded | Return |
//! | Chase | target in attack range | Attack |
//! | Chase | should flee | Flee |
//! | Chase | chased longer than `chase_timeout` | Return |
//! | Attack | target lost or dead | Idle |
//! | Attack | target out of attack range | Chase |
//! | Attack | should flee | Flee |
//! | Flee | fled longer than `flee_duration` | Return |
//! | Return | enemy detected and not fleeing | Chase |
//! | Return | back at spawn | heal, forget threat, Patrol or Idle |
//!
//! A stunned owner makes no decisions and does not move.

use crate::actor::{ActorKind, MonsterActor, MonsterType, Target};
use crate::config::{IdleRollMode, MonsterTuning};
use crate::controller::{AiContext, AiPolicy};
use crate::state::AiState;
use ember_common::{AiError, AiResult};
use glam::Vec3;
use tracing::{debug, info};

/// Decision table and per-state behaviour of a hostile monster.
#[derive(Debug, Clone)]
pub struct MonsterPolicy {
    tuning: MonsterTuning,
    can_flee: bool,
    patrol_wait_timer: f32,
    attack_cooldown_timer: f32,
    current_patrol_target: Option<Vec3>,
    wander_point: Option<Vec3>,
}

impl Default for MonsterPolicy {
    fn default() -> Self {
        Self::new(MonsterTuning::default())
    }
}

impl MonsterPolicy {
    /// Creates a policy from tuning values.
    #[must_use]
    pub fn new(tuning: MonsterTuning) -> Self {
        let can_flee = tuning.can_flee;
        Self {
            tuning,
            can_flee,
            patrol_wait_timer: 0.0,
            attack_cooldown_timer: 0.0,
            current_patrol_target: None,
            wander_point: None,
        }
    }

    /// Tuning values.
    #[must_use]
    pub fn tuning(&self) -> &MonsterTuning {
        &self.tuning
    }

    /// Whether this monster may flee. Always false for bosses once bound.
    #[must_use]
    pub fn can_flee(&self) -> bool {
        self.can_flee
    }

    /// Remaining wait at the current patrol point.
    #[must_use]
    pub fn patrol_wait_timer(&self) -> f32 {
        self.patrol_wait_timer
    }

    /// Seconds until the next attack may land.
    #[must_use]
    pub fn attack_cooldown_timer(&self) -> f32 {
        self.attack_cooldown_timer
    }

    /// Patrol point currently being walked to.
    #[must_use]
    pub fn current_patrol_target(&self) -> Option<Vec3> {
        self.current_patrol_target
    }

    /// Point of the current wander.
    #[must_use]
    pub fn wander_point(&self) -> Option<Vec3> {
        self.wander_point
    }

    /// Low-health flee check. Strictly below the threshold.
    pub fn should_flee<A: MonsterActor + ?Sized>(&self, owner: &A) -> bool {
        self.can_flee && owner.health_fraction() < self.tuning.flee_health_threshold
    }

    fn live_target<A: MonsterActor + ?Sized>(owner: &A) -> Option<Target> {
        owner.current_target().filter(|t| t.alive)
    }

    fn roll_idle_wander<A: MonsterActor + ?Sized>(
        &self,
        cx: &mut AiContext<'_, A>,
    ) -> Option<AiState> {
        if cx.state_timer() > self.tuning.idle_wander_delay
            && cx.rng().f32() < self.tuning.idle_wander_chance
        {
            Some(AiState::Wander)
        } else {
            None
        }
    }

    fn think_chase<A: MonsterActor + ?Sized>(&self, cx: &mut AiContext<'_, A>) -> Option<AiState> {
        let target = match Self::live_target(cx.owner()) {
            Some(t) if !cx.owner().is_chase_range_exceeded() => t,
            _ => return Some(AiState::Return),
        };

        if cx.is_in_attack_range(&target) {
            Some(AiState::Attack)
        } else if self.should_flee(cx.owner()) {
            Some(AiState::Flee)
        } else if cx.state_timer() > self.tuning.chase_timeout {
            Some(AiState::Return)
        } else {
            None
        }
    }

    fn think_attack<A: MonsterActor + ?Sized>(&self, cx: &mut AiContext<'_, A>) -> Option<AiState> {
        let target = match Self::live_target(cx.owner()) {
            Some(t) => t,
            None => return Some(AiState::Idle),
        };

        if !cx.is_in_attack_range(&target) {
            Some(AiState::Chase)
        } else if self.should_flee(cx.owner()) {
            Some(AiState::Flee)
        } else {
            None
        }
    }

    fn think_return<A: MonsterActor + ?Sized>(&self, cx: &mut AiContext<'_, A>) -> Option<AiState> {
        if cx.owner_mut().detect_enemy().is_some() && !self.should_flee(cx.owner()) {
            return Some(AiState::Chase);
        }

        let spawn = cx.owner().spawn_position();
        if !cx.has_reached_target(spawn) {
            return None;
        }

        let owner = cx.owner_mut();
        let amount = owner.max_health() * self.tuning.return_heal_fraction;
        owner.heal(amount);
        owner.clear_threat();
        info!(
            entity = %owner.id(),
            healed = amount,
            health = owner.health(),
            "monster back at spawn"
        );

        if owner.patrol_points().is_empty() {
            Some(AiState::Idle)
        } else {
            Some(AiState::Patrol)
        }
    }

    fn update_patrol<A: MonsterActor + ?Sized>(&mut self, cx: &mut AiContext<'_, A>) {
        if self.patrol_wait_timer > 0.0 {
            self.patrol_wait_timer -= cx.dt();
            return;
        }

        let point = match self.current_patrol_target {
            Some(p) => p,
            None => return,
        };

        if cx.has_reached_target(point) {
            self.patrol_wait_timer = self.tuning.patrol_wait_time;
            self.current_patrol_target = cx.owner_mut().next_patrol_point();
            cx.set_move_target(self.current_patrol_target);
            cx.stop_moving();
        } else {
            cx.move_to_target(point);
        }
    }

    fn update_attack<A: MonsterActor + ?Sized>(&mut self, cx: &mut AiContext<'_, A>) {
        let target = match Self::live_target(cx.owner()) {
            Some(t) => t,
            None => return,
        };

        cx.face_towards(target.position);
        self.attack_cooldown_timer -= cx.dt();
        if self.attack_cooldown_timer <= 0.0 {
            cx.owner_mut().attack(target.id);
            self.attack_cooldown_timer = self.tuning.attack_cooldown;
        }
    }
}

impl<A: MonsterActor + ?Sized> AiPolicy<A> for MonsterPolicy {
    const NAME: &'static str = "monster";

    fn bind(&mut self, cx: &mut AiContext<'_, A>) -> AiResult<Option<AiState>> {
        let owner = cx.owner();
        if owner.kind() != ActorKind::Monster {
            return Err(AiError::IncompatibleOwner {
                entity: owner.id(),
                kind: owner.kind().to_string(),
                policy: <Self as AiPolicy<A>>::NAME,
            });
        }
        self.tuning.check()?;

        self.can_flee = self.tuning.can_flee;
        if owner.monster_type() == MonsterType::Boss && self.can_flee {
            info!(entity = %owner.id(), "boss monsters never flee, overriding can_flee");
            self.can_flee = false;
        }

        self.patrol_wait_timer = 0.0;
        self.attack_cooldown_timer = 0.0;
        self.current_patrol_target = None;
        self.wander_point = None;

        if owner.patrol_points().is_empty() {
            Ok(None)
        } else {
            Ok(Some(AiState::Patrol))
        }
    }

    fn think(&mut self, cx: &mut AiContext<'_, A>) -> Option<AiState> {
        if cx.owner().is_stunned() {
            return None;
        }

        match cx.state() {
            state @ (AiState::Idle | AiState::Patrol | AiState::Wander) => {
                if cx.owner_mut().detect_enemy().is_some() {
                    return Some(AiState::Chase);
                }
                if state == AiState::Idle && self.tuning.idle_roll_mode == IdleRollMode::PerThink {
                    return self.roll_idle_wander(cx);
                }
                None
            },
            AiState::Chase => self.think_chase(cx),
            AiState::Attack => self.think_attack(cx),
            AiState::Flee => (cx.state_timer() > self.tuning.flee_duration).then_some(AiState::Return),
            AiState::Return => self.think_return(cx),
            AiState::Wait => None,
        }
    }

    fn on_update(&mut self, state: AiState, cx: &mut AiContext<'_, A>) -> Option<AiState> {
        if cx.owner().is_stunned() {
            return None;
        }

        match state {
            AiState::Idle => {
                if self.tuning.idle_roll_mode == IdleRollMode::PerFrame {
                    return self.roll_idle_wander(cx);
                }
            },
            AiState::Patrol => self.update_patrol(cx),
            AiState::Chase => {
                if let Some(target) = Self::live_target(cx.owner()) {
                    cx.move_towards_target(&target);
                }
            },
            AiState::Attack => self.update_attack(cx),
            AiState::Flee => match Self::live_target(cx.owner()) {
                Some(target) => cx.move_away_from_target(&target, self.tuning.flee_distance),
                None => {
                    let spawn = cx.owner().spawn_position();
                    cx.move_to_target(spawn);
                },
            },
            AiState::Return => {
                let spawn = cx.owner().spawn_position();
                cx.move_to_target(spawn);
            },
            AiState::Wander => {
                return match self.wander_point {
                    Some(point)
                        if !cx.has_reached_target(point)
                            && cx.state_timer() <= self.tuning.wander_timeout =>
                    {
                        cx.move_to_target(point);
                        None
                    },
                    _ => Some(AiState::Idle),
                };
            },
            AiState::Wait => {},
        }
        None
    }

    fn on_enter(&mut self, state: AiState, cx: &mut AiContext<'_, A>) {
        match state {
            AiState::Patrol => {
                self.patrol_wait_timer = 0.0;
                self.current_patrol_target = cx.owner_mut().next_patrol_point();
                cx.set_move_target(self.current_patrol_target);
            },
            AiState::Attack => {
                self.attack_cooldown_timer = 0.0;
                cx.stop_moving();
            },
            AiState::Wander => {
                let point = cx.random_wander_point(self.tuning.wander_radius);
                self.wander_point = Some(point);
                cx.set_move_target(Some(point));
            },
            AiState::Return => {
                let spawn = cx.owner().spawn_position();
                cx.set_move_target(Some(spawn));
            },
            AiState::Flee => {
                debug!(
                    entity = %cx.owner().id(),
                    health = cx.owner().health_fraction(),
                    "monster fleeing"
                );
            },
            AiState::Idle | AiState::Chase | AiState::Wait => {},
        }
    }
}
