use bevy_math::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::constants::{BOT_HEADING_SAMPLES, BOT_WANDER_ARRIVE, BOT_WANDER_RADIUS, BOT_WANDER_SWING};
use common::{
    collision::resolve_obstacles,
    constants::{MAP_BOUND, PLAYER_RADIUS},
    protocol::{MapMode, Obstacle},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Seek {
    Toward,
    Away,
}

// Angular offset (in sample steps) of the i-th probed heading: 0, +1, -1, +2, -2, ...
#[must_use]
pub const fn heading_offset(i: usize) -> i32 {
    let half = i.div_ceil(2) as i32;
    if i % 2 == 1 { half } else { -half }
}

#[must_use]
pub fn random_heading<R: Rng>(mode: MapMode, rng: &mut R) -> Vec2 {
    match mode {
        MapMode::Arena => Vec2::from_angle(rng.random_range(0.0..TAU)),
        MapMode::Platformer => Vec2::new(if rng.random_bool(0.5) { 1.0 } else { -1.0 }, 0.0),
    }
}

// Check a probe point against the clamp square and the obstacle field
#[must_use]
pub fn probe_is_clear(probe: Vec3, obstacles: &[Obstacle]) -> bool {
    probe.x.abs() <= MAP_BOUND && probe.z.abs() <= MAP_BOUND && !resolve_obstacles(probe, obstacles, PLAYER_RADIUS).blocked
}

/// Probe `BOT_HEADING_SAMPLES` evenly spaced headings, starting at `desired` and fanning out to
/// both sides, one `step` from `from` (arena XZ). Blocked or out-of-bounds probes are dropped; of
/// the rest the one nearest to (or farthest from) `anchor` wins, earlier headings on ties. With
/// every heading blocked a random one is returned.
pub fn search_heading<R: Rng>(
    from: Vec3,
    desired: Vec2,
    anchor: Vec2,
    seek: Seek,
    step: f32,
    obstacles: &[Obstacle],
    rng: &mut R,
) -> Vec2 {
    let base = desired.to_angle();
    let slice = TAU / BOT_HEADING_SAMPLES as f32;
    let mut best: Option<(Vec2, f32)> = None;

    for i in 0..BOT_HEADING_SAMPLES {
        let dir = Vec2::from_angle((heading_offset(i) as f32).mul_add(slice, base));
        let probe = Vec3::new(dir.x.mul_add(step, from.x), from.y, dir.y.mul_add(step, from.z));
        if !probe_is_clear(probe, obstacles) {
            continue;
        }

        let distance = Vec2::new(probe.x, probe.z).distance(anchor);
        let better = best.is_none_or(|(_, best_distance)| match seek {
            Seek::Toward => distance < best_distance,
            Seek::Away => distance > best_distance,
        });
        if better {
            best = Some((dir, distance));
        }
    }

    best.map_or_else(|| random_heading(MapMode::Arena, rng), |(dir, _)| dir)
}

// Next point on the arena wander circle, advancing the phase at `speed`
pub fn wander_circle_goal(phase: &mut f32, speed: f32, delta: f32) -> Vec2 {
    *phase = (speed / BOT_WANDER_RADIUS).mul_add(delta, *phase) % TAU;
    Vec2::from_angle(*phase) * BOT_WANDER_RADIUS
}

// Platformer left/right swing between the turn points
#[must_use]
pub fn wander_swing(x: f32, moving_right: bool) -> bool {
    if moving_right && x >= BOT_WANDER_SWING - BOT_WANDER_ARRIVE {
        false
    } else if !moving_right && x <= -BOT_WANDER_SWING + BOT_WANDER_ARRIVE {
        true
    } else {
        moving_right
    }
}
