//! Tuning parameters for controllers and policies.
//!
//! Values arrive from an external configuration loader as plain numbers.
//! `validate` clamps values into sensible ranges the way a settings screen
//! would; `check` rejects values the state machine cannot work with.

use ember_common::{AiError, AiResult};
use serde::{Deserialize, Serialize};

/// Engine-level parameters shared by every policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seconds between decision passes
    pub think_interval: f32,
    /// Scales the owner's move speed
    pub move_speed_multiplier: f32,
    /// Distance below which a point counts as reached
    pub arrival_threshold: f32,
    /// Fraction of the remaining turn applied per second of rotation
    pub turn_rate: f32,
    /// Seed of the controller's random source
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            think_interval: 0.2,
            move_speed_multiplier: 1.0,
            arrival_threshold: 0.5,
            turn_rate: 10.0,
            seed: 0x5EED,
        }
    }
}

impl AiConfig {
    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.think_interval = self.think_interval.clamp(0.01, 5.0);
        self.move_speed_multiplier = self.move_speed_multiplier.clamp(0.0, 10.0);
        self.arrival_threshold = self.arrival_threshold.clamp(0.01, 10.0);
        self.turn_rate = self.turn_rate.clamp(0.0, 100.0);
    }

    /// Reject values the engine cannot run with.
    pub fn check(&self) -> AiResult<()> {
        if self.think_interval.is_nan() || self.think_interval <= 0.0 {
            return Err(AiError::invalid("think_interval", "must be positive"));
        }
        if self.arrival_threshold < 0.0 {
            return Err(AiError::invalid("arrival_threshold", "must not be negative"));
        }
        if self.move_speed_multiplier < 0.0 {
            return Err(AiError::invalid(
                "move_speed_multiplier",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// How the monster's idle wander roll is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleRollMode {
    /// One roll per think pass
    #[default]
    PerThink,
    /// One roll per frame, matching older builds
    PerFrame,
}

/// Combat policy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterTuning {
    /// Whether the monster may flee at low health (ignored for bosses)
    pub can_flee: bool,
    /// Health fraction below which the monster flees
    pub flee_health_threshold: f32,
    /// Seconds spent fleeing before heading home
    pub flee_duration: f32,
    /// How far away from the target a flee aims
    pub flee_distance: f32,
    /// Seconds of chasing before giving up
    pub chase_timeout: f32,
    /// Seconds to wait at each patrol point
    pub patrol_wait_time: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Seconds idle before wander rolls start
    pub idle_wander_delay: f32,
    /// Chance per roll of leaving Idle to wander
    pub idle_wander_chance: f32,
    /// Scheduling of the idle wander roll
    pub idle_roll_mode: IdleRollMode,
    /// Radius of wander points around the current position
    pub wander_radius: f32,
    /// Seconds before an unfinished wander gives up
    pub wander_timeout: f32,
    /// Fraction of max health restored on reaching spawn
    pub return_heal_fraction: f32,
}

impl Default for MonsterTuning {
    fn default() -> Self {
        Self {
            can_flee: true,
            flee_health_threshold: 0.2,
            flee_duration: 3.0,
            flee_distance: 10.0,
            chase_timeout: 10.0,
            patrol_wait_time: 2.0,
            attack_cooldown: 1.5,
            idle_wander_delay: 3.0,
            idle_wander_chance: 0.3,
            idle_roll_mode: IdleRollMode::PerThink,
            wander_radius: 5.0,
            wander_timeout: 5.0,
            return_heal_fraction: 0.5,
        }
    }
}

impl MonsterTuning {
    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.flee_health_threshold = self.flee_health_threshold.clamp(0.0, 1.0);
        self.idle_wander_chance = self.idle_wander_chance.clamp(0.0, 1.0);
        self.return_heal_fraction = self.return_heal_fraction.clamp(0.0, 1.0);
        self.flee_duration = self.flee_duration.max(0.0);
        self.flee_distance = self.flee_distance.max(0.0);
        self.chase_timeout = self.chase_timeout.max(0.0);
        self.patrol_wait_time = self.patrol_wait_time.max(0.0);
        self.attack_cooldown = self.attack_cooldown.max(0.0);
        self.wander_radius = self.wander_radius.max(0.0);
        self.wander_timeout = self.wander_timeout.max(0.0);
    }

    /// Reject values the policy cannot run with.
    pub fn check(&self) -> AiResult<()> {
        if !(0.0..=1.0).contains(&self.flee_health_threshold) {
            return Err(AiError::invalid(
                "flee_health_threshold",
                "must be within [0, 1]",
            ));
        }
        if self.wander_radius < 0.0 {
            return Err(AiError::invalid("wander_radius", "must not be negative"));
        }
        Ok(())
    }
}

/// Ambient policy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcTuning {
    /// Shortest idle pause
    pub idle_time_min: f32,
    /// Longest idle pause
    pub idle_time_max: f32,
    /// Chance of wandering when an idle pause ends
    pub wander_chance: f32,
    /// Radius of wander points around home
    pub wander_radius: f32,
    /// Leash distance from home
    pub max_wander_distance: f32,
    /// Seconds before an unfinished wander gives up
    pub wander_timeout: f32,
}

impl Default for NpcTuning {
    fn default() -> Self {
        Self {
            idle_time_min: 2.0,
            idle_time_max: 5.0,
            wander_chance: 0.5,
            wander_radius: 5.0,
            max_wander_distance: 10.0,
            wander_timeout: 10.0,
        }
    }
}

impl NpcTuning {
    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.idle_time_min = self.idle_time_min.max(0.0);
        self.idle_time_max = self.idle_time_max.max(self.idle_time_min);
        self.wander_chance = self.wander_chance.clamp(0.0, 1.0);
        self.wander_radius = self.wander_radius.max(0.0);
        self.max_wander_distance = self.max_wander_distance.max(0.0);
        self.wander_timeout = self.wander_timeout.max(0.0);
    }

    /// Reject values the policy cannot run with.
    pub fn check(&self) -> AiResult<()> {
        if self.idle_time_min < 0.0 || self.idle_time_max < self.idle_time_min {
            return Err(AiError::invalid(
                "idle_time_max",
                format!(
                    "idle range [{}, {}] is empty or negative",
                    self.idle_time_min, self.idle_time_max
                ),
            ));
        }
        if self.max_wander_distance < 0.0 {
            return Err(AiError::invalid(
                "max_wander_distance",
                "must not be negative",
            ));
        }
        Ok(())
    }
}
