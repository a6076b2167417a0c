use bevy_math::Vec3;

use super::helpers::{axis_penetration, push_out};
use crate::{
    constants::{LEDGE_LANDING_MARGIN, LEDGE_LANDING_TOLERANCE},
    protocol::Obstacle,
};

/// Outcome of pushing a candidate position out of the obstacle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub blocked: bool,
    pub pos: Vec3,
}

/// Push a circular footprint out of every overlapping obstacle, one obstacle at a time.
///
/// Each overlap is resolved along the axis of least penetration (Z on ties). Obstacles are visited
/// in order and earlier pushes are not revisited, so concave corners made of several boxes can
/// leave the entity slightly inside one of them. `pos.y` is returned untouched.
#[must_use]
pub fn resolve_obstacles(pos: Vec3, obstacles: &[Obstacle], radius: f32) -> Resolution {
    let mut resolved = pos;
    let mut blocked = false;

    for obstacle in obstacles {
        let half_x = obstacle.half_x() + radius;
        let half_z = obstacle.half_z() + radius;
        let dx = resolved.x - obstacle.pos.x;
        let dz = resolved.z - obstacle.pos.z;

        if dx.abs() < half_x && dz.abs() < half_z {
            blocked = true;
            let pen_x = axis_penetration(dx, half_x);
            let pen_z = axis_penetration(dz, half_z);
            if pen_x < pen_z {
                resolved.x += push_out(dx, pen_x);
            } else {
                resolved.z += push_out(dz, pen_z);
            }
        }
    }

    Resolution { blocked, pos: resolved }
}

/// Ledge landing test for the platformer.
///
/// Returns the top surface Y of the first obstacle (in slice order) whose top the feet crossed
/// this frame (`prev_bottom` at or above it, `new_bottom` at or below it) and whose X extent,
/// widened by a small margin, contains `x`.
#[must_use]
pub fn land_on_ledge(prev_bottom: f32, new_bottom: f32, x: f32, obstacles: &[Obstacle]) -> Option<f32> {
    obstacles
        .iter()
        .filter(|obstacle| (x - obstacle.pos.x).abs() <= obstacle.half_x() + LEDGE_LANDING_MARGIN)
        .map(Obstacle::top)
        .find(|&top| prev_bottom >= top - LEDGE_LANDING_TOLERANCE && new_bottom <= top)
}
