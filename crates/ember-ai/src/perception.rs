//! Range and field-of-view queries.
//!
//! Detection itself belongs to the owning actor; these helpers are what an
//! actor implementation uses to answer `detect_enemy`.

use crate::actor::Target;
use ember_common::{planar_direction, planar_distance, shortest_angle, yaw_of};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Whether `to` lies within `range` of `from` on the ground plane.
#[must_use]
pub fn in_range(from: Vec3, to: Vec3, range: f32) -> bool {
    planar_distance(from, to) <= range
}

/// Whether `point` lies inside a view cone of total angle `fov` radians
/// centred on `yaw`. A point on top of the observer is always visible.
#[must_use]
pub fn in_field_of_view(origin: Vec3, yaw: f32, point: Vec3, fov: f32) -> bool {
    let dir = planar_direction(origin, point);
    if dir == Vec3::ZERO {
        return true;
    }
    shortest_angle(yaw, yaw_of(dir)).abs() <= fov * 0.5
}

/// Sight parameters of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perception {
    /// Maximum detection distance
    pub sight_range: f32,
    /// Total view cone angle in degrees (360 = omnidirectional)
    pub field_of_view: f32,
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            sight_range: 10.0,
            field_of_view: 120.0,
        }
    }
}

impl Perception {
    /// Creates sight parameters.
    #[must_use]
    pub const fn new(sight_range: f32, field_of_view: f32) -> Self {
        Self {
            sight_range,
            field_of_view,
        }
    }

    /// Checks whether an observer at `origin` facing `yaw` sees `point`.
    #[must_use]
    pub fn can_see(&self, origin: Vec3, yaw: f32, point: Vec3) -> bool {
        in_range(origin, point, self.sight_range)
            && (self.field_of_view >= 360.0
                || in_field_of_view(origin, yaw, point, self.field_of_view.to_radians()))
    }

    /// Picks the closest living candidate the observer can see.
    ///
    /// Ties on distance keep the earlier candidate.
    pub fn nearest_visible<I>(&self, origin: Vec3, yaw: f32, candidates: I) -> Option<Target>
    where
        I: IntoIterator<Item = Target>,
    {
        candidates
            .into_iter()
            .filter(|t| t.alive && self.can_see(origin, yaw, t.position))
            .fold(None, |best: Option<(f32, Target)>, t| {
                let d = planar_distance(origin, t.position);
                match best {
                    Some((bd, _)) if bd <= d => best,
                    _ => Some((d, t)),
                }
            })
            .map(|(_, t)| t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::EntityId;

    #[test]
    fn test_in_range_boundary() {
        assert!(in_range(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), 5.0));
        assert!(!in_range(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.1), 5.0));
    }

    #[test]
    fn test_field_of_view() {
        // facing +Z with a 90 degree cone
        let fov = 90.0_f32.to_radians();
        assert!(in_field_of_view(Vec3::ZERO, 0.0, Vec3::new(0.0, 0.0, 5.0), fov));
        assert!(in_field_of_view(Vec3::ZERO, 0.0, Vec3::new(1.0, 0.0, 5.0), fov));
        assert!(!in_field_of_view(Vec3::ZERO, 0.0, Vec3::new(5.0, 0.0, 1.0), fov));
        assert!(!in_field_of_view(Vec3::ZERO, 0.0, Vec3::new(0.0, 0.0, -5.0), fov));
    }

    #[test]
    fn test_omnidirectional_sight() {
        let sight = Perception::new(10.0, 360.0);
        assert!(sight.can_see(Vec3::ZERO, 0.0, Vec3::new(0.0, 0.0, -5.0)));
        assert!(!sight.can_see(Vec3::ZERO, 0.0, Vec3::new(0.0, 0.0, -15.0)));
    }

    #[test]
    fn test_nearest_visible_skips_dead_and_hidden() {
        let sight = Perception::new(20.0, 90.0);
        let near_dead = Target {
            id: EntityId::from_raw(1),
            position: Vec3::new(0.0, 0.0, 2.0),
            alive: false,
        };
        let behind = Target::new(EntityId::from_raw(2), Vec3::new(0.0, 0.0, -3.0));
        let far = Target::new(EntityId::from_raw(3), Vec3::new(0.0, 0.0, 12.0));
        let mid = Target::new(EntityId::from_raw(4), Vec3::new(0.0, 0.0, 8.0));

        let found = sight.nearest_visible(Vec3::ZERO, 0.0, [near_dead, behind, far, mid]);
        assert_eq!(found.map(|t| t.id), Some(EntityId::from_raw(4)));
    }

    #[test]
    fn test_nearest_visible_none() {
        let sight = Perception::default();
        assert!(sight.nearest_visible(Vec3::ZERO, 0.0, []).is_none());
    }
}
