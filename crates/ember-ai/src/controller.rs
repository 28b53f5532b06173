//! Generic timer-driven state machine engine.
//!
//! An [`AiController`] owns the timers, the current/previous state, the move
//! target, a seeded random source and the observer list. Everything that is
//! specific to a kind of actor lives in an [`AiPolicy`]: the decision table
//! (`think`), the per-frame behaviour of each state (`on_update`) and the
//! entry/exit hooks.
//!
//! Each frame the owner's driver calls [`AiController::update`]:
//!
//! 1. Nothing happens while the controller is disabled, unbound, lent a
//!    different actor than the bound one, or the owner is dead.
//! 2. `state_timer` and `think_timer` advance by `dt`.
//! 3. Once `think_timer` reaches `think_interval` it resets and the policy
//!    gets a decision pass.
//! 4. The current state's continuous update runs, on every frame.
//!
//! Decisions are throttled while movement stays smooth.

use crate::actor::{Actor, Target};
use crate::config::AiConfig;
use crate::events::StateObserver;
use crate::state::{AiState, StateTransition};
use ember_common::{
    forward_of, planar_direction, planar_distance, turn_towards, yaw_of, AiResult, EntityId,
};
use glam::Vec3;
use std::f32::consts::TAU;
use std::fmt;
use tracing::{debug, error, trace};

/// Decision table and per-state behaviour plugged into an [`AiController`].
///
/// A policy never changes state directly; it returns the state it wants and
/// the engine performs the transition, so hooks and notifications always
/// fire in the same order.
pub trait AiPolicy<A: ?Sized> {
    /// Short policy name used in logs and errors.
    const NAME: &'static str;

    /// Validates the owner and captures whatever the policy anchors on.
    ///
    /// Called by `initialize` after the engine has reset to `Idle`. The
    /// returned state, if any, is entered straight away.
    fn bind(&mut self, cx: &mut AiContext<'_, A>) -> AiResult<Option<AiState>>;

    /// Throttled decision pass for the current state.
    fn think(&mut self, cx: &mut AiContext<'_, A>) -> Option<AiState>;

    /// Continuous per-frame behaviour of `state`.
    fn on_update(&mut self, state: AiState, cx: &mut AiContext<'_, A>) -> Option<AiState>;

    /// Called after `state` becomes current.
    fn on_enter(&mut self, state: AiState, cx: &mut AiContext<'_, A>) {
        let _ = (state, cx);
    }

    /// Called before `state` is left.
    fn on_exit(&mut self, state: AiState, cx: &mut AiContext<'_, A>) {
        let _ = (state, cx);
    }
}

/// Per-call view of the controller handed to policy callbacks.
///
/// Borrows the owner for the duration of one callback together with the
/// engine fields a policy may read or drive.
pub struct AiContext<'a, A: ?Sized> {
    owner: &'a mut A,
    dt: f32,
    state: AiState,
    previous: AiState,
    state_timer: &'a mut f32,
    move_target: &'a mut Option<Vec3>,
    rng: &'a mut fastrand::Rng,
    config: &'a AiConfig,
}

impl<'a, A: ?Sized> AiContext<'a, A> {
    /// The owning actor.
    pub fn owner(&self) -> &A {
        &*self.owner
    }

    /// The owning actor, mutably.
    pub fn owner_mut(&mut self) -> &mut A {
        &mut *self.owner
    }

    /// Frame delta time in seconds.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// State the controller is in while this callback runs.
    #[must_use]
    pub fn state(&self) -> AiState {
        self.state
    }

    /// State before the most recent transition.
    #[must_use]
    pub fn previous_state(&self) -> AiState {
        self.previous
    }

    /// Seconds spent in the current state.
    #[must_use]
    pub fn state_timer(&self) -> f32 {
        *self.state_timer
    }

    /// Starts the current state's clock over without leaving the state.
    pub fn restart_state_timer(&mut self) {
        *self.state_timer = 0.0;
    }

    /// Current navigation destination.
    #[must_use]
    pub fn move_target(&self) -> Option<Vec3> {
        *self.move_target
    }

    /// Sets the navigation destination without moving.
    pub fn set_move_target(&mut self, target: Option<Vec3>) {
        *self.move_target = target;
    }

    /// The controller's seeded random source.
    pub fn rng(&mut self) -> &mut fastrand::Rng {
        &mut *self.rng
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &AiConfig {
        self.config
    }

    /// Uniform point within `radius` of `center` on the ground plane.
    pub fn random_point_around(&mut self, center: Vec3, radius: f32) -> Vec3 {
        let angle = self.rng.f32() * TAU;
        // sqrt keeps the distribution uniform over the disk area
        let dist = radius.max(0.0) * self.rng.f32().sqrt();
        center + Vec3::new(angle.cos() * dist, 0.0, angle.sin() * dist)
    }
}

impl<'a, A: Actor + ?Sized> AiContext<'a, A> {
    /// Seeks `point`: turns toward it, then steps along the ground plane at
    /// the owner's speed. Never steps past the point.
    pub fn move_to_target(&mut self, point: Vec3) {
        *self.move_target = Some(point);

        let pos = self.owner.position();
        let dir = planar_direction(pos, point);
        if dir == Vec3::ZERO {
            return;
        }

        self.turn_to(yaw_of(dir));

        let remaining = planar_distance(pos, point);
        let step = (self.owner.move_speed() * self.config.move_speed_multiplier * self.dt)
            .clamp(0.0, remaining);
        self.owner.set_position(pos + dir * step);
    }

    /// Seeks the target's current position.
    pub fn move_towards_target(&mut self, target: &Target) {
        self.move_to_target(target.position);
    }

    /// Seeks a point `distance` away from the target, on the line from the
    /// target through the owner.
    pub fn move_away_from_target(&mut self, target: &Target, distance: f32) {
        let mut away = planar_direction(target.position, self.owner.position());
        if away == Vec3::ZERO {
            // standing on the target: back off opposite to facing
            away = -forward_of(self.owner.facing());
        }
        self.move_to_target(target.position + away * distance);
    }

    /// Whether the owner is within the arrival threshold of `point`.
    #[must_use]
    pub fn has_reached_target(&self, point: Vec3) -> bool {
        planar_distance(self.owner.position(), point) <= self.config.arrival_threshold
    }

    /// Whether the target is within the owner's attack range.
    #[must_use]
    pub fn is_in_attack_range(&self, target: &Target) -> bool {
        planar_distance(self.owner.position(), target.position) <= self.owner.attack_range()
    }

    /// Uniform point within `radius` of the owner's current position.
    pub fn random_wander_point(&mut self, radius: f32) -> Vec3 {
        let center = self.owner.position();
        self.random_point_around(center, radius)
    }

    /// Turns toward `point` without moving.
    pub fn face_towards(&mut self, point: Vec3) {
        let dir = planar_direction(self.owner.position(), point);
        if dir != Vec3::ZERO {
            self.turn_to(yaw_of(dir));
        }
    }

    /// Asks the owner to halt its own movement.
    pub fn stop_moving(&mut self) {
        self.owner.stop_moving();
    }

    fn turn_to(&mut self, yaw: f32) {
        let facing = turn_towards(self.owner.facing(), yaw, self.config.turn_rate * self.dt);
        self.owner.set_facing(facing);
    }
}

/// Engine-owned bookkeeping, kept apart from the policy so both can be
/// borrowed at once.
struct Machine {
    owner: Option<EntityId>,
    enabled: bool,
    current: AiState,
    previous: AiState,
    state_timer: f32,
    think_timer: f32,
    last_dt: f32,
    move_target: Option<Vec3>,
    config: AiConfig,
    rng: fastrand::Rng,
    observers: Vec<Box<dyn StateObserver>>,
}

impl Machine {
    fn context<'a, A: ?Sized>(&'a mut self, owner: &'a mut A, dt: f32) -> AiContext<'a, A> {
        AiContext {
            owner,
            dt,
            state: self.current,
            previous: self.previous,
            state_timer: &mut self.state_timer,
            move_target: &mut self.move_target,
            rng: &mut self.rng,
            config: &self.config,
        }
    }

    fn reset(&mut self) {
        self.owner = None;
        self.current = AiState::Idle;
        self.previous = AiState::Idle;
        self.state_timer = 0.0;
        self.think_timer = 0.0;
        self.last_dt = 0.0;
        self.move_target = None;
    }
}

/// Per-actor AI state machine driven by a policy.
pub struct AiController<P> {
    policy: P,
    machine: Machine,
}

impl<P> AiController<P> {
    /// Creates an unbound controller. It does nothing until `initialize`.
    #[must_use]
    pub fn new(policy: P, config: AiConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.seed);
        Self {
            policy,
            machine: Machine {
                owner: None,
                enabled: true,
                current: AiState::Idle,
                previous: AiState::Idle,
                state_timer: 0.0,
                think_timer: 0.0,
                last_dt: 0.0,
                move_target: None,
                config,
                rng,
                observers: Vec::new(),
            },
        }
    }

    /// Reseeds the random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.machine.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Registers an observer notified after every state change.
    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) {
        self.machine.observers.push(Box::new(observer));
    }

    /// Current state.
    #[must_use]
    pub fn current_state(&self) -> AiState {
        self.machine.current
    }

    /// State before the most recent transition.
    #[must_use]
    pub fn previous_state(&self) -> AiState {
        self.machine.previous
    }

    /// Seconds since the current state was entered.
    #[must_use]
    pub fn state_timer(&self) -> f32 {
        self.machine.state_timer
    }

    /// Seconds since the last decision pass.
    #[must_use]
    pub fn think_timer(&self) -> f32 {
        self.machine.think_timer
    }

    /// Current navigation destination.
    #[must_use]
    pub fn move_target(&self) -> Option<Vec3> {
        self.machine.move_target
    }

    /// Bound owner, if `initialize` succeeded.
    #[must_use]
    pub fn owner(&self) -> Option<EntityId> {
        self.machine.owner
    }

    /// Whether updates run.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.machine.enabled
    }

    /// Suspends or resumes the controller without touching its state.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.machine.enabled = enabled;
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.machine.config
    }

    /// The policy.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The policy, mutably.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }
}

impl<P> AiController<P> {
    /// Binds the controller to `owner`, resets to `Idle` and zeroes timers.
    ///
    /// On failure the error is logged and returned, and the controller stays
    /// inert: every later update is a no-op.
    pub fn initialize<A>(&mut self, owner: &mut A) -> AiResult<()>
    where
        A: Actor + ?Sized,
        P: AiPolicy<A>,
    {
        self.machine.reset();

        let bound = match self.machine.config.check() {
            Ok(()) => self.policy.bind(&mut self.machine.context(owner, 0.0)),
            Err(e) => Err(e),
        };

        match bound {
            Ok(initial) => {
                self.machine.owner = Some(owner.id());
                debug!(entity = %owner.id(), policy = P::NAME, "AI controller initialized");
                if let Some(state) = initial {
                    self.transition(owner, state, 0.0);
                }
                Ok(())
            },
            Err(e) => {
                error!(entity = %owner.id(), policy = P::NAME, "AI controller left inert: {e}");
                Err(e)
            },
        }
    }

    /// Advances the controller by one frame.
    pub fn update<A>(&mut self, owner: &mut A, dt: f32)
    where
        A: Actor + ?Sized,
        P: AiPolicy<A>,
    {
        if !self.machine.enabled || !self.is_bound_to(owner) || !owner.is_alive() {
            return;
        }

        let dt = dt.max(0.0);
        self.machine.last_dt = dt;
        self.machine.state_timer += dt;
        self.machine.think_timer += dt;

        if self.machine.think_timer >= self.machine.config.think_interval {
            self.machine.think_timer = 0.0;
            trace!(entity = %owner.id(), state = %self.machine.current, "think");
            if let Some(next) = self.policy.think(&mut self.machine.context(owner, dt)) {
                self.transition(owner, next, dt);
            }
        }

        let state = self.machine.current;
        if let Some(next) = self
            .policy
            .on_update(state, &mut self.machine.context(owner, dt))
        {
            self.transition(owner, next, dt);
        }
    }

    /// Switches to `new_state`.
    ///
    /// Returns `None` without firing hooks when `new_state` is already
    /// current or `owner` is not the bound actor.
    pub fn change_state<A>(&mut self, owner: &mut A, new_state: AiState) -> Option<StateTransition>
    where
        A: Actor + ?Sized,
        P: AiPolicy<A>,
    {
        if !self.is_bound_to(owner) {
            return None;
        }
        let dt = self.machine.last_dt;
        self.transition(owner, new_state, dt)
    }

    /// Whether `owner` is the actor this controller was initialized with.
    pub fn is_bound_to<A: Actor + ?Sized>(&self, owner: &A) -> bool {
        self.machine.owner == Some(owner.id())
    }

    fn transition<A>(&mut self, owner: &mut A, new_state: AiState, dt: f32) -> Option<StateTransition>
    where
        A: Actor + ?Sized,
        P: AiPolicy<A>,
    {
        let old = self.machine.current;
        if new_state == old {
            return None;
        }

        self.policy.on_exit(old, &mut self.machine.context(owner, dt));
        self.machine.previous = old;
        self.machine.current = new_state;
        self.machine.state_timer = 0.0;
        self.policy
            .on_enter(new_state, &mut self.machine.context(owner, dt));

        let transition = StateTransition {
            entity: owner.id(),
            from: old,
            to: new_state,
        };
        debug!(entity = %transition.entity, from = %old, to = %new_state, "AI state changed");
        for observer in &mut self.machine.observers {
            observer.on_state_changed(&transition);
        }
        Some(transition)
    }
}

impl<P: fmt::Debug> fmt::Debug for AiController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiController")
            .field("policy", &self.policy)
            .field("owner", &self.machine.owner)
            .field("enabled", &self.machine.enabled)
            .field("current", &self.machine.current)
            .field("previous", &self.machine.previous)
            .field("state_timer", &self.machine.state_timer)
            .field("think_timer", &self.machine.think_timer)
            .field("move_target", &self.machine.move_target)
            .field("observers", &self.machine.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockActor;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records hook calls and follows a scripted decision.
    #[derive(Debug, Default)]
    struct ScriptedPolicy {
        thinks: u32,
        updates: u32,
        entered: Vec<AiState>,
        exited: Vec<AiState>,
        next_decision: Option<AiState>,
        next_update: Option<AiState>,
        reject: bool,
    }

    impl AiPolicy<MockActor> for ScriptedPolicy {
        const NAME: &'static str = "scripted";

        fn bind(&mut self, cx: &mut AiContext<'_, MockActor>) -> AiResult<Option<AiState>> {
            if self.reject {
                return Err(ember_common::AiError::IncompatibleOwner {
                    entity: cx.owner().id,
                    kind: cx.owner().kind.to_string(),
                    policy: Self::NAME,
                });
            }
            Ok(None)
        }

        fn think(&mut self, _cx: &mut AiContext<'_, MockActor>) -> Option<AiState> {
            self.thinks += 1;
            self.next_decision.take()
        }

        fn on_update(
            &mut self,
            _state: AiState,
            _cx: &mut AiContext<'_, MockActor>,
        ) -> Option<AiState> {
            self.updates += 1;
            self.next_update.take()
        }

        fn on_enter(&mut self, state: AiState, _cx: &mut AiContext<'_, MockActor>) {
            self.entered.push(state);
        }

        fn on_exit(&mut self, state: AiState, _cx: &mut AiContext<'_, MockActor>) {
            self.exited.push(state);
        }
    }

    fn bound() -> (AiController<ScriptedPolicy>, MockActor) {
        let mut actor = MockActor::monster(Vec3::ZERO);
        let mut controller = AiController::new(ScriptedPolicy::default(), AiConfig::default());
        controller
            .initialize(&mut actor)
            .expect("scripted policy should bind");
        (controller, actor)
    }

    #[test]
    fn test_initialize_resets_to_idle() {
        let (controller, actor) = bound();
        assert_eq!(controller.current_state(), AiState::Idle);
        assert_eq!(controller.state_timer(), 0.0);
        assert_eq!(controller.think_timer(), 0.0);
        assert_eq!(controller.owner(), Some(actor.id));
    }

    #[test]
    fn test_update_before_initialize_is_noop() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        let mut controller = AiController::new(ScriptedPolicy::default(), AiConfig::default());
        controller.update(&mut actor, 1.0);
        assert_eq!(controller.state_timer(), 0.0);
        assert_eq!(controller.policy().updates, 0);
    }

    #[test]
    fn test_rejected_bind_leaves_controller_inert() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        let policy = ScriptedPolicy {
            reject: true,
            ..ScriptedPolicy::default()
        };
        let mut controller = AiController::new(policy, AiConfig::default());
        assert!(controller.initialize(&mut actor).is_err());
        assert_eq!(controller.owner(), None);

        controller.update(&mut actor, 0.5);
        assert_eq!(controller.policy().thinks, 0);
        assert_eq!(controller.policy().updates, 0);
    }

    #[test]
    fn test_invalid_config_rejected_at_initialize() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        let config = AiConfig {
            think_interval: 0.0,
            ..AiConfig::default()
        };
        let mut controller = AiController::new(ScriptedPolicy::default(), config);
        assert!(controller.initialize(&mut actor).is_err());
        assert_eq!(controller.owner(), None);
    }

    #[test]
    fn test_other_actor_is_ignored() {
        let (mut controller, _actor) = bound();
        let mut stranger = MockActor::monster(Vec3::ZERO);
        controller.update(&mut stranger, 1.0);
        assert_eq!(controller.state_timer(), 0.0);
        assert!(controller
            .change_state(&mut stranger, AiState::Chase)
            .is_none());
    }

    #[test]
    fn test_dead_owner_suspends() {
        let (mut controller, mut actor) = bound();
        actor.alive = false;
        controller.update(&mut actor, 1.0);
        assert_eq!(controller.state_timer(), 0.0);
        assert_eq!(controller.policy().updates, 0);
    }

    #[test]
    fn test_disabled_controller_freezes() {
        let (mut controller, mut actor) = bound();
        controller.update(&mut actor, 0.1);
        controller.set_enabled(false);
        controller.policy_mut().next_decision = Some(AiState::Chase);
        for _ in 0..10 {
            controller.update(&mut actor, 0.1);
        }
        assert_eq!(controller.current_state(), AiState::Idle);
        assert!((controller.state_timer() - 0.1).abs() < 1e-6);

        controller.set_enabled(true);
        controller.update(&mut actor, 0.2);
        assert_eq!(controller.current_state(), AiState::Chase);
    }

    #[test]
    fn test_think_is_throttled_but_update_runs_every_frame() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        let config = AiConfig {
            think_interval: 0.25,
            ..AiConfig::default()
        };
        let mut controller = AiController::new(ScriptedPolicy::default(), config);
        controller
            .initialize(&mut actor)
            .expect("scripted policy should bind");
        // binary-exact steps, four per think interval
        for _ in 0..20 {
            controller.update(&mut actor, 0.0625);
        }
        assert_eq!(controller.policy().updates, 20);
        assert_eq!(controller.policy().thinks, 5);
    }

    #[test]
    fn test_change_state_runs_hooks_in_order() {
        let (mut controller, mut actor) = bound();
        controller.update(&mut actor, 0.1);

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        controller.subscribe(move |t: &StateTransition| sink.borrow_mut().push(*t));

        let t = controller
            .change_state(&mut actor, AiState::Patrol)
            .expect("transition should happen");
        assert_eq!(t.from, AiState::Idle);
        assert_eq!(t.to, AiState::Patrol);
        assert_eq!(t.entity, actor.id);

        assert_eq!(controller.current_state(), AiState::Patrol);
        assert_eq!(controller.previous_state(), AiState::Idle);
        assert_eq!(controller.state_timer(), 0.0);
        assert_eq!(controller.policy().exited, vec![AiState::Idle]);
        assert_eq!(controller.policy().entered, vec![AiState::Patrol]);
        assert_eq!(*log.borrow(), vec![t]);
    }

    #[test]
    fn test_decision_then_update_same_frame() {
        let (mut controller, mut actor) = bound();
        controller.policy_mut().next_decision = Some(AiState::Chase);
        controller.policy_mut().next_update = Some(AiState::Attack);
        controller.update(&mut actor, 0.25);
        assert_eq!(controller.current_state(), AiState::Attack);
        assert_eq!(controller.previous_state(), AiState::Chase);
        assert_eq!(
            controller.policy().entered,
            vec![AiState::Chase, AiState::Attack]
        );
    }

    #[test]
    fn test_move_to_target_does_not_overshoot() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        actor.move_speed = 100.0;
        let mut machine = AiController::new(ScriptedPolicy::default(), AiConfig::default()).machine;
        let goal = Vec3::new(0.0, 0.0, 3.0);
        machine.context(&mut actor, 1.0).move_to_target(goal);
        assert!((actor.position - goal).length() < 1e-5);
        assert_eq!(machine.move_target, Some(goal));
    }

    #[test]
    fn test_move_to_target_steps_by_speed() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        actor.move_speed = 4.0;
        let config = AiConfig {
            move_speed_multiplier: 0.5,
            ..AiConfig::default()
        };
        let mut machine = AiController::new(ScriptedPolicy::default(), config).machine;
        machine
            .context(&mut actor, 0.5)
            .move_to_target(Vec3::new(10.0, 0.0, 0.0));
        assert!((actor.position.x - 1.0).abs() < 1e-5);
        // turned toward +X
        assert!(actor.facing > 0.0);
    }

    #[test]
    fn test_move_away_from_target() {
        let mut actor = MockActor::monster(Vec3::new(2.0, 0.0, 0.0));
        actor.move_speed = 1.0;
        let mut machine = AiController::new(ScriptedPolicy::default(), AiConfig::default()).machine;
        let threat = Target::new(EntityId::from_raw(99), Vec3::ZERO);
        machine
            .context(&mut actor, 1.0)
            .move_away_from_target(&threat, 10.0);
        assert!((actor.position.x - 3.0).abs() < 1e-5);
        assert_eq!(machine.move_target, Some(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_range_queries() {
        let mut actor = MockActor::monster(Vec3::ZERO);
        actor.attack_range = 2.0;
        let mut machine = AiController::new(ScriptedPolicy::default(), AiConfig::default()).machine;
        let cx = machine.context(&mut actor, 0.0);
        assert!(cx.has_reached_target(Vec3::new(0.5, 0.0, 0.0)));
        assert!(!cx.has_reached_target(Vec3::new(0.51, 0.0, 0.0)));
        let near = Target::new(EntityId::from_raw(1), Vec3::new(2.0, 0.0, 0.0));
        let far = Target::new(EntityId::from_raw(2), Vec3::new(2.1, 0.0, 0.0));
        assert!(cx.is_in_attack_range(&near));
        assert!(!cx.is_in_attack_range(&far));
    }

    #[test]
    fn test_seeded_wander_points_repeat() {
        let sample = || {
            let mut actor = MockActor::monster(Vec3::ZERO);
            let mut machine =
                AiController::new(ScriptedPolicy::default(), AiConfig::default()).machine;
            let mut cx = machine.context(&mut actor, 0.0);
            let points: Vec<Vec3> = (0..4).map(|_| cx.random_wander_point(5.0)).collect();
            points
        };
        assert_eq!(sample(), sample());
    }

    proptest! {
        #[test]
        fn prop_self_transition_is_noop(index in 0usize..8, frames in 1usize..20) {
            let (mut controller, mut actor) = bound();
            let state = AiState::ALL[index];
            controller.change_state(&mut actor, state);
            for _ in 0..frames {
                controller.update(&mut actor, 0.01);
            }
            let timer = controller.state_timer();
            let entered = controller.policy().entered.len();
            let exited = controller.policy().exited.len();
            let notified = Rc::new(RefCell::new(0usize));
            let sink = Rc::clone(&notified);
            controller.subscribe(move |_: &StateTransition| *sink.borrow_mut() += 1);

            prop_assert!(controller.change_state(&mut actor, state).is_none());
            prop_assert_eq!(controller.state_timer(), timer);
            prop_assert_eq!(controller.policy().entered.len(), entered);
            prop_assert_eq!(controller.policy().exited.len(), exited);
            prop_assert_eq!(*notified.borrow(), 0);
        }

        #[test]
        fn prop_change_state_bookkeeping(from in 0usize..8, to in 0usize..8) {
            prop_assume!(from != to);
            let (mut controller, mut actor) = bound();
            controller.change_state(&mut actor, AiState::ALL[from]);
            controller.update(&mut actor, 0.1);
            let prior = controller.current_state();

            controller.change_state(&mut actor, AiState::ALL[to]);
            prop_assert_eq!(controller.current_state(), AiState::ALL[to]);
            prop_assert_eq!(controller.previous_state(), prior);
            prop_assert_eq!(controller.state_timer(), 0.0);
        }
    }
}
