//! Scenario configuration.
//!
//! A scenario is a TOML file holding the frame settings, the AI tuning
//! sections and the list of actors to spawn. Missing keys fall back to their
//! defaults, so a scenario only needs to name what it changes.

use ember_ai::{ActorKind, AiConfig, MonsterTuning, MonsterType, NpcTuning, Perception};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Scenario used when no path is given on the command line.
pub const DEFAULT_SCENARIO: &str = "crates/ember-sim/scenarios/outpost.toml";

/// Simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Frame Settings ===
    /// Fixed frame delta in seconds
    pub dt: f32,
    /// Number of frames to run
    pub frames: u32,

    // === AI Settings ===
    /// Engine settings shared by every controller
    pub ai: AiConfig,
    /// Monster policy tuning
    pub monster: MonsterTuning,
    /// NPC policy tuning
    pub npc: NpcTuning,
    /// Monster sight
    pub perception: Perception,
    /// Distance at which a player engages an NPC in conversation
    pub interact_radius: f32,

    // === Scenario ===
    /// Actors to spawn, in order
    pub actors: Vec<ActorSpec>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 30.0,
            frames: 900,
            ai: AiConfig::default(),
            monster: MonsterTuning::default(),
            npc: NpcTuning::default(),
            perception: Perception::default(),
            interact_radius: 2.0,
            actors: Vec::new(),
        }
    }
}

/// One actor in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSpec {
    /// Display name used in logs
    pub name: String,
    /// What drives the actor: a monster or NPC controller, or a scripted path
    pub kind: ActorKind,
    /// Spawn position
    pub position: Vec3,
    /// Monster tier
    pub monster_type: MonsterType,
    /// Monster patrol route
    pub patrol: Vec<Vec3>,
    /// Path a scripted player walks, once
    pub waypoints: Vec<Vec3>,
    /// Move speed in units per second
    pub move_speed: f32,
    /// Attack reach
    pub attack_range: f32,
    /// Damage per attack
    pub attack_damage: f32,
    /// Maximum health
    pub max_health: f32,
    /// Starting health (defaults to max)
    pub health: Option<f32>,
    /// Leash distance from spawn while chasing
    pub chase_range: f32,

    // === Per-monster overrides of the shared tuning ===
    /// Whether this monster may flee
    pub can_flee: Option<bool>,
    /// Health fraction below which this monster flees
    pub flee_health_threshold: Option<f32>,
    /// Sight distance of this monster
    pub detection_range: Option<f32>,
}

impl Default for ActorSpec {
    fn default() -> Self {
        Self {
            name: String::from("actor"),
            kind: ActorKind::Monster,
            position: Vec3::ZERO,
            monster_type: MonsterType::Normal,
            patrol: Vec::new(),
            waypoints: Vec::new(),
            move_speed: 3.0,
            attack_range: 2.0,
            attack_damage: 10.0,
            max_health: 100.0,
            health: None,
            chase_range: 20.0,
            can_flee: None,
            flee_health_threshold: None,
            detection_range: None,
        }
    }
}

impl ActorSpec {
    /// Shared monster tuning with this actor's overrides applied.
    #[must_use]
    pub fn monster_tuning(&self, shared: &MonsterTuning) -> MonsterTuning {
        let mut tuning = shared.clone();
        if let Some(can_flee) = self.can_flee {
            tuning.can_flee = can_flee;
        }
        if let Some(threshold) = self.flee_health_threshold {
            tuning.flee_health_threshold = threshold;
        }
        tuning
    }

    /// Shared sight with this actor's detection range applied.
    #[must_use]
    pub fn perception(&self, shared: Perception) -> Perception {
        Perception {
            sight_range: self.detection_range.unwrap_or(shared.sight_range),
            ..shared
        }
    }
}

impl SimConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!("Scenario {} not found, using defaults", path.display());
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read scenario: {e}");
                    return Self::default();
                }

                match toml::from_str::<Self>(&contents) {
                    Ok(mut config) => {
                        config.validate();
                        info!(
                            actors = config.actors.len(),
                            "Loaded scenario from {}",
                            path.display()
                        );
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse scenario: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open scenario: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved scenario to {}", path.display());
        Ok(())
    }

    /// Clamp values to sensible ranges.
    pub fn validate(&mut self) {
        self.dt = self.dt.clamp(1.0 / 240.0, 0.5);
        self.frames = self.frames.min(1_000_000);
        self.interact_radius = self.interact_radius.max(0.0);
        self.perception.sight_range = self.perception.sight_range.max(0.0);
        self.perception.field_of_view = self.perception.field_of_view.clamp(0.0, 360.0);

        self.ai.validate();
        self.monster.validate();
        self.npc.validate();

        for actor in &mut self.actors {
            actor.move_speed = actor.move_speed.max(0.0);
            actor.attack_range = actor.attack_range.max(0.0);
            actor.attack_damage = actor.attack_damage.max(0.0);
            actor.max_health = actor.max_health.max(1.0);
            actor.health = actor.health.map(|h| h.clamp(0.0, actor.max_health));
            actor.flee_health_threshold = actor.flee_health_threshold.map(|t| t.clamp(0.0, 1.0));
            actor.detection_range = actor.detection_range.map(|r| r.max(0.0));
        }
    }

    /// Simulated seconds covered by the run.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.dt * self.frames as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.frames, 900);
        assert!((config.duration() - 30.0).abs() < 0.01);
        assert!(config.actors.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig::default();
        config.dt = 5.0;
        config.perception.field_of_view = 720.0;
        config.actors.push(ActorSpec {
            max_health: 50.0,
            health: Some(80.0),
            move_speed: -1.0,
            ..ActorSpec::default()
        });

        config.validate();

        assert_eq!(config.dt, 0.5);
        assert_eq!(config.perception.field_of_view, 360.0);
        assert_eq!(config.actors[0].health, Some(50.0));
        assert_eq!(config.actors[0].move_speed, 0.0);
    }

    #[test]
    fn test_monster_overrides() {
        let shared = MonsterTuning::default();
        let coward = ActorSpec {
            flee_health_threshold: Some(0.5),
            detection_range: Some(4.0),
            ..ActorSpec::default()
        };
        let brute = ActorSpec {
            can_flee: Some(false),
            ..ActorSpec::default()
        };

        let tuning = coward.monster_tuning(&shared);
        assert!(tuning.can_flee);
        assert_eq!(tuning.flee_health_threshold, 0.5);
        assert_eq!(tuning.chase_timeout, shared.chase_timeout);
        assert!(!brute.monster_tuning(&shared).can_flee);

        let sight = Perception::new(10.0, 90.0);
        assert_eq!(coward.perception(sight), Perception::new(4.0, 90.0));
        assert_eq!(brute.perception(sight), sight);
    }

    #[test]
    fn test_overrides_parse_and_clamp() {
        let mut config: SimConfig = toml::from_str(
            r#"
[[actors]]
name = "imp"
monster_type = "Minion"
can_flee = false
flee_health_threshold = 1.5
"#,
        )
        .expect("scenario should parse");
        config.validate();

        let imp = &config.actors[0];
        assert_eq!(imp.monster_type, MonsterType::Minion);
        assert_eq!(imp.can_flee, Some(false));
        assert_eq!(imp.flee_health_threshold, Some(1.0));
        assert_eq!(imp.detection_range, None);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("scenario.toml");

        let mut config = SimConfig::default();
        config.frames = 120;
        config.monster.can_flee = false;
        config.actors.push(ActorSpec {
            name: String::from("wolf"),
            patrol: vec![Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0)],
            ..ActorSpec::default()
        });

        config.save_to(&path).expect("Failed to save scenario");

        let loaded = SimConfig::load_from(&path);
        assert_eq!(loaded.frames, 120);
        assert!(!loaded.monster.can_flee);
        assert_eq!(loaded.actors.len(), 1);
        assert_eq!(loaded.actors[0].name, "wolf");
        assert_eq!(loaded.actors[0].patrol.len(), 2);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = SimConfig::load_from("/nonexistent/path/scenario.toml");
        assert_eq!(config.frames, SimConfig::default().frames);
    }

    #[test]
    fn test_partial_scenario_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("partial.toml");
        fs::write(
            &path,
            r#"
frames = 10

[npc]
wander_chance = 0.9

[[actors]]
name = "miller"
kind = "Npc"
position = [1.0, 0.0, 2.0]
"#,
        )
        .expect("Failed to write scenario");

        let config = SimConfig::load_from(&path);
        assert_eq!(config.frames, 10);
        assert!((config.npc.wander_chance - 0.9).abs() < 1e-6);
        assert_eq!(config.npc.idle_time_min, NpcTuning::default().idle_time_min);
        assert_eq!(config.actors[0].kind, ActorKind::Npc);
        assert_eq!(config.actors[0].position, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(config.actors[0].move_speed, 3.0);
    }

    #[test]
    fn test_bundled_scenario_parses() {
        let contents = include_str!("../scenarios/outpost.toml");
        let config: SimConfig = toml::from_str(contents).expect("bundled scenario should parse");
        assert!(!config.actors.is_empty());
    }
}
