//! Ambient policy for non-combat NPCs.
//!
//! NPCs idle for a random while, sometimes wander to a point near home, and
//! walk back when they stray past their leash. While the NPC is interacting
//! (dialogue, trading) no decisions are made at all; the current state and
//! its movement carry on unchanged.

use crate::actor::{ActorKind, NpcActor};
use crate::config::NpcTuning;
use crate::controller::{AiContext, AiPolicy};
use crate::state::AiState;
use ember_common::{clamp_to_radius, planar_distance, AiError, AiResult};
use glam::Vec3;
use tracing::trace;

/// Decision table and per-state behaviour of an ambient NPC.
#[derive(Debug, Clone)]
pub struct NpcPolicy {
    tuning: NpcTuning,
    home_position: Vec3,
    idle_duration: f32,
    wander_point: Option<Vec3>,
}

impl Default for NpcPolicy {
    fn default() -> Self {
        Self::new(NpcTuning::default())
    }
}

impl NpcPolicy {
    /// Creates a policy from tuning values.
    #[must_use]
    pub fn new(tuning: NpcTuning) -> Self {
        Self {
            idle_duration: tuning.idle_time_min,
            tuning,
            home_position: Vec3::ZERO,
            wander_point: None,
        }
    }

    /// Tuning values.
    #[must_use]
    pub fn tuning(&self) -> &NpcTuning {
        &self.tuning
    }

    /// Anchor captured when the controller was initialized.
    #[must_use]
    pub fn home_position(&self) -> Vec3 {
        self.home_position
    }

    /// Length of the current idle pause.
    #[must_use]
    pub fn idle_duration(&self) -> f32 {
        self.idle_duration
    }

    /// Point of the current wander.
    #[must_use]
    pub fn wander_point(&self) -> Option<Vec3> {
        self.wander_point
    }

    fn sample_idle_duration<A: ?Sized>(&self, cx: &mut AiContext<'_, A>) -> f32 {
        let span = (self.tuning.idle_time_max - self.tuning.idle_time_min).max(0.0);
        self.tuning.idle_time_min + cx.rng().f32() * span
    }

    /// Random point within `wander_radius` of home, pulled back onto the
    /// leash circle if it lands outside.
    fn sample_wander_point<A: ?Sized>(&self, cx: &mut AiContext<'_, A>) -> Vec3 {
        let raw = cx.random_point_around(self.home_position, self.tuning.wander_radius);
        clamp_to_radius(self.home_position, raw, self.tuning.max_wander_distance)
    }
}

impl<A: NpcActor + ?Sized> AiPolicy<A> for NpcPolicy {
    const NAME: &'static str = "npc";

    fn bind(&mut self, cx: &mut AiContext<'_, A>) -> AiResult<Option<AiState>> {
        let owner = cx.owner();
        if owner.kind() != ActorKind::Npc {
            return Err(AiError::IncompatibleOwner {
                entity: owner.id(),
                kind: owner.kind().to_string(),
                policy: <Self as AiPolicy<A>>::NAME,
            });
        }
        self.tuning.check()?;

        self.home_position = owner.position();
        self.wander_point = None;
        self.idle_duration = self.sample_idle_duration(cx);
        Ok(None)
    }

    fn think(&mut self, cx: &mut AiContext<'_, A>) -> Option<AiState> {
        if cx.owner().is_interacting() {
            return None;
        }

        match cx.state() {
            AiState::Idle => {
                if cx.state_timer() <= self.idle_duration {
                    return None;
                }
                if cx.rng().f32() < self.tuning.wander_chance {
                    return Some(AiState::Wander);
                }
                self.idle_duration = self.sample_idle_duration(cx);
                cx.restart_state_timer();
                trace!(entity = %cx.owner().id(), idle = self.idle_duration, "idle re-rolled");
                None
            },
            AiState::Wander => {
                if planar_distance(cx.owner().position(), self.home_position)
                    > self.tuning.max_wander_distance
                {
                    return Some(AiState::Return);
                }
                match self.wander_point {
                    Some(point)
                        if !cx.has_reached_target(point)
                            && cx.state_timer() <= self.tuning.wander_timeout =>
                    {
                        None
                    },
                    _ => Some(AiState::Idle),
                }
            },
            AiState::Return => cx
                .has_reached_target(self.home_position)
                .then_some(AiState::Idle),
            AiState::Patrol
            | AiState::Chase
            | AiState::Attack
            | AiState::Flee
            | AiState::Wait => None,
        }
    }

    fn on_update(&mut self, state: AiState, cx: &mut AiContext<'_, A>) -> Option<AiState> {
        match state {
            AiState::Wander => {
                if let Some(point) = self.wander_point {
                    cx.move_to_target(point);
                }
            },
            AiState::Return => cx.move_to_target(self.home_position),
            _ => {},
        }
        None
    }

    fn on_enter(&mut self, state: AiState, cx: &mut AiContext<'_, A>) {
        match state {
            AiState::Idle => {
                self.idle_duration = self.sample_idle_duration(cx);
                cx.stop_moving();
            },
            AiState::Wander => {
                let point = self.sample_wander_point(cx);
                self.wander_point = Some(point);
                cx.set_move_target(Some(point));
            },
            AiState::Return => cx.set_move_target(Some(self.home_position)),
            _ => {},
        }
    }
}
