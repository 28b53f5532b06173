//! Simulated actors and the frame loop that drives their controllers.

use crate::config::{ActorSpec, SimConfig};
use crossbeam_channel::Sender;
use ember_ai::{
    Actor, ActorKind, AiController, AiEvent, AiEventBus, AiState, MonsterActor, MonsterPolicy,
    MonsterType, NpcActor, NpcPolicy, Perception, Target,
};
use ember_ai::perception::in_range;
use ember_common::{planar_direction, planar_distance, yaw_of, EntityId};
use glam::Vec3;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Golden-ratio increment used to spread per-actor seeds.
const SEED_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// An actor living in the simulation.
///
/// Implements every owner capability; which ones get used depends on the
/// controller it is handed to.
#[derive(Debug)]
pub struct SimActor {
    id: EntityId,
    name: String,
    kind: ActorKind,
    alive: bool,
    position: Vec3,
    facing: f32,
    move_speed: f32,
    attack_range: f32,
    attack_damage: f32,
    health: f32,
    max_health: f32,
    monster_type: MonsterType,
    spawn_position: Vec3,
    chase_range: f32,
    patrol_points: Vec<Vec3>,
    patrol_cursor: usize,
    waypoints: Vec<Vec3>,
    waypoint_cursor: usize,
    perception: Perception,
    visible: Vec<Target>,
    target: Option<Target>,
    interacting: bool,
    pending_hits: Vec<(EntityId, f32)>,
    events: Sender<AiEvent>,
}

impl SimActor {
    /// Spawns an actor from its scenario entry.
    pub fn spawn(spec: &ActorSpec, perception: Perception, events: Sender<AiEvent>) -> Self {
        Self {
            id: EntityId::new(),
            name: spec.name.clone(),
            kind: spec.kind,
            alive: true,
            position: spec.position,
            facing: 0.0,
            move_speed: spec.move_speed,
            attack_range: spec.attack_range,
            attack_damage: spec.attack_damage,
            health: spec.health.unwrap_or(spec.max_health),
            max_health: spec.max_health,
            monster_type: spec.monster_type,
            spawn_position: spec.position,
            chase_range: spec.chase_range,
            patrol_points: spec.patrol.clone(),
            patrol_cursor: 0,
            waypoints: spec.waypoints.clone(),
            waypoint_cursor: 0,
            perception,
            visible: Vec::new(),
            target: None,
            interacting: false,
            pending_hits: Vec::new(),
            events,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the actor is currently talking to a player.
    pub fn is_talking(&self) -> bool {
        self.interacting
    }

    /// Updates what the actor can perceive this frame and refreshes its
    /// remembered target from the same snapshot.
    fn observe(&mut self, players: &[Target]) {
        self.visible.clear();
        self.visible.extend_from_slice(players);

        if let Some(target) = self.target.as_mut() {
            match players.iter().find(|p| p.id == target.id) {
                Some(seen) => *target = *seen,
                None => target.alive = false,
            }
        }

        // NPC sight doubles as the conversation radius
        self.interacting = self.kind == ActorKind::Npc
            && players
                .iter()
                .any(|p| in_range(self.position, p.position, self.perception.sight_range));
    }

    /// Walks the scripted path, stopping at the last waypoint.
    fn follow_waypoints(&mut self, dt: f32) {
        let point = match self.waypoints.get(self.waypoint_cursor) {
            Some(p) => *p,
            None => return,
        };

        let remaining = planar_distance(self.position, point);
        let step = self.move_speed * dt;
        if remaining <= step {
            self.position = Vec3::new(point.x, self.position.y, point.z);
            self.waypoint_cursor += 1;
            return;
        }

        let dir = planar_direction(self.position, point);
        self.facing = yaw_of(dir);
        self.position += dir * step;
    }

    fn take_hit(&mut self, damage: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health - damage).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
        }
        !self.alive
    }

    fn as_target(&self) -> Target {
        Target {
            id: self.id,
            position: self.position,
            alive: self.alive,
        }
    }
}

impl Actor for SimActor {
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

    fn stop_moving(&mut self) {}
}

impl MonsterActor for SimActor {
    fn monster_type(&self) -> MonsterType {
        self.monster_type
    }

    fn detect_enemy(&mut self) -> Option<Target> {
        let found =
            self.perception
                .nearest_visible(self.position, self.facing, self.visible.iter().copied());
        if found.is_some() {
            self.target = found;
        }
        found
    }

    fn current_target(&self) -> Option<Target> {
        self.target
    }

    fn is_chase_range_exceeded(&self) -> bool {
        planar_distance(self.position, self.spawn_position) > self.chase_range
    }

    fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    fn patrol_points(&self) -> &[Vec3] {
        &self.patrol_points
    }

    fn next_patrol_point(&mut self) -> Option<Vec3> {
        let point = *self.patrol_points.get(self.patrol_cursor)?;
        self.patrol_cursor = (self.patrol_cursor + 1) % self.patrol_points.len();
        Some(point)
    }

    fn heal(&mut self, amount: f32) {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        let _ = self.events.try_send(AiEvent::Healed {
            entity: self.id,
            amount: self.health - before,
        });
    }

    fn clear_threat(&mut self) {
        self.target = None;
    }

    fn attack(&mut self, target: EntityId) {
        self.pending_hits.push((target, self.attack_damage));
        let _ = self.events.try_send(AiEvent::AttackPerformed {
            attacker: self.id,
            target,
        });
    }
}

impl NpcActor for SimActor {
    fn is_interacting(&self) -> bool {
        self.interacting
    }
}

/// What drives an actor each frame.
#[derive(Debug)]
enum Brain {
    Monster(AiController<MonsterPolicy>),
    Npc(AiController<NpcPolicy>),
    Scripted,
}

/// Summary of a finished run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    /// Frames simulated
    pub frames: u64,
    /// State changes observed
    pub transitions: usize,
    /// Attacks performed
    pub attacks: usize,
    /// Total health restored
    pub healed: f32,
    /// Actors dead at the end
    pub defeated: Vec<String>,
}

/// A set of actors stepped together at a fixed `dt`.
#[derive(Debug)]
pub struct World {
    actors: Vec<SimActor>,
    brains: Vec<Brain>,
    bus: AiEventBus,
    names: HashMap<EntityId, String>,
    dt: f32,
    frame: u64,
}

impl World {
    /// Spawns every actor in the scenario and binds its controller.
    ///
    /// An actor whose controller fails to bind stays in the world with an
    /// inert controller.
    pub fn new(config: &SimConfig) -> Self {
        let capacity = (config.actors.len() * 64).max(1024);
        let bus = AiEventBus::new(capacity);
        let mut actors = Vec::with_capacity(config.actors.len());
        let mut brains = Vec::with_capacity(config.actors.len());
        let mut names = HashMap::new();

        for (index, spec) in config.actors.iter().enumerate() {
            let perception = if spec.kind == ActorKind::Npc {
                npc_perception(config)
            } else {
                spec.perception(config.perception)
            };
            let mut actor = SimActor::spawn(spec, perception, bus.sender());
            let seed = config.ai.seed ^ SEED_SPREAD.wrapping_mul(index as u64 + 1);

            let brain = match spec.kind {
                ActorKind::Monster => {
                    let policy = MonsterPolicy::new(spec.monster_tuning(&config.monster));
                    let mut controller =
                        AiController::new(policy, config.ai.clone()).with_seed(seed);
                    controller.subscribe(bus.sender());
                    if let Err(e) = controller.initialize(&mut actor) {
                        warn!(actor = %spec.name, "monster left without AI: {e}");
                    }
                    Brain::Monster(controller)
                },
                ActorKind::Npc => {
                    let mut controller =
                        AiController::new(NpcPolicy::new(config.npc.clone()), config.ai.clone())
                            .with_seed(seed);
                    controller.subscribe(bus.sender());
                    if let Err(e) = controller.initialize(&mut actor) {
                        warn!(actor = %spec.name, "npc left without AI: {e}");
                    }
                    Brain::Npc(controller)
                },
                ActorKind::Player => Brain::Scripted,
            };

            debug!(actor = %spec.name, id = %actor.id, kind = %spec.kind, "spawned");
            names.insert(actor.id, spec.name.clone());
            actors.push(actor);
            brains.push(brain);
        }

        Self {
            actors,
            brains,
            bus,
            names,
            dt: config.dt,
            frame: 0,
        }
    }

    /// Actors in spawn order.
    pub fn actors(&self) -> &[SimActor] {
        &self.actors
    }

    /// Current AI state of the named actor, `None` for scripted actors.
    pub fn state_of(&self, name: &str) -> Option<AiState> {
        let index = self.actors.iter().position(|a| a.name == name)?;
        match &self.brains[index] {
            Brain::Monster(c) => Some(c.current_state()),
            Brain::Npc(c) => Some(c.current_state()),
            Brain::Scripted => None,
        }
    }

    /// Advances every actor by one frame and returns the events it produced.
    pub fn step(&mut self) -> Vec<AiEvent> {
        let players: Vec<Target> = self
            .actors
            .iter()
            .filter(|a| a.kind == ActorKind::Player && a.alive)
            .map(SimActor::as_target)
            .collect();

        for (actor, brain) in self.actors.iter_mut().zip(self.brains.iter_mut()) {
            actor.observe(&players);
            match brain {
                Brain::Monster(controller) => controller.update(actor, self.dt),
                Brain::Npc(controller) => controller.update(actor, self.dt),
                Brain::Scripted => {
                    if actor.alive {
                        actor.follow_waypoints(self.dt);
                    }
                },
            }
        }

        self.resolve_hits();
        self.frame += 1;

        let events = self.bus.drain();
        for event in &events {
            self.log_event(event);
        }
        events
    }

    /// Runs `frames` frames and tallies what happened.
    pub fn run(&mut self, frames: u32) -> RunReport {
        let mut report = RunReport::default();
        for _ in 0..frames {
            for event in self.step() {
                match event {
                    AiEvent::StateChanged { .. } => report.transitions += 1,
                    AiEvent::AttackPerformed { .. } => report.attacks += 1,
                    AiEvent::Healed { amount, .. } => report.healed += amount,
                }
            }
        }
        report.frames = self.frame;
        report.defeated = self
            .actors
            .iter()
            .filter(|a| !a.alive)
            .map(|a| a.name.clone())
            .collect();
        report
    }

    fn resolve_hits(&mut self) {
        let hits: Vec<(EntityId, f32)> = self
            .actors
            .iter_mut()
            .flat_map(|a| a.pending_hits.drain(..))
            .collect();

        for (target, damage) in hits {
            if let Some(victim) = self.actors.iter_mut().find(|a| a.id == target) {
                if victim.take_hit(damage) {
                    info!(frame = self.frame, "{} was defeated", victim.name);
                }
            }
        }
    }

    fn name_of(&self, id: EntityId) -> &str {
        self.names.get(&id).map_or("?", String::as_str)
    }

    fn log_event(&self, event: &AiEvent) {
        match *event {
            AiEvent::StateChanged { entity, from, to } => {
                info!(frame = self.frame, "{}: {from} -> {to}", self.name_of(entity));
            },
            AiEvent::AttackPerformed { attacker, target } => {
                debug!(
                    frame = self.frame,
                    "{} attacks {}",
                    self.name_of(attacker),
                    self.name_of(target)
                );
            },
            AiEvent::Healed { entity, amount } => {
                info!(frame = self.frame, "{} healed {amount:.1}", self.name_of(entity));
            },
        }
    }
}

/// NPCs notice players all around them, within the interaction radius.
fn npc_perception(config: &SimConfig) -> Perception {
    Perception::new(config.interact_radius, 360.0)
}
