//! Ground-plane math.
//!
//! Actors move on the horizontal x/z plane with y pointing up. Every helper
//! here ignores the y component of its inputs, so an actor standing on a
//! ledge still measures distances the way its navigation does.
//!
//! Facing is a yaw angle in radians around +Y, where yaw 0 looks down +Z and
//! yaw π/2 looks down +X.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Lengths below this are treated as zero when normalizing.
pub const PLANAR_EPSILON: f32 = 1e-4;

/// Projects a vector onto the ground plane.
#[must_use]
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points on the ground plane.
#[must_use]
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}

/// Unit direction from `from` to `to` on the ground plane, or zero when the
/// points coincide.
#[must_use]
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    let delta = flatten(to - from);
    let len = delta.length();
    if len < PLANAR_EPSILON {
        Vec3::ZERO
    } else {
        delta / len
    }
}

/// Yaw angle that looks along `dir`.
#[must_use]
#[inline]
pub fn yaw_of(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Unit forward vector for a yaw angle.
#[must_use]
#[inline]
pub fn forward_of(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Signed shortest rotation from `from` to `to`, in `[-π, π]`.
#[must_use]
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    let diff = (to - from).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Rotates `current` toward `target` by fraction `t` of the remaining
/// shortest angle. `t` is clamped to `[0, 1]`.
#[must_use]
pub fn turn_towards(current: f32, target: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let turned = current + shortest_angle(current, target) * t;
    // keep yaw bounded so long simulations do not drift
    shortest_angle(0.0, turned)
}

/// Keeps `point` within `max_distance` of `center` on the ground plane.
///
/// Points already inside the circle are returned unchanged. Points outside
/// are re-projected onto the boundary along the same direction from
/// `center`, preserving their height.
#[must_use]
pub fn clamp_to_radius(center: Vec3, point: Vec3, max_distance: f32) -> Vec3 {
    let offset = flatten(point - center);
    let len = offset.length();
    if len <= max_distance || len < PLANAR_EPSILON {
        return point;
    }
    let clamped = center + offset * (max_distance.max(0.0) / len);
    Vec3::new(clamped.x, point.y, clamped.z)
}
