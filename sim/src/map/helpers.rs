use bevy_math::{Vec2, Vec3};

use crate::constants::CLEAR_ZONE_RADIUS;
use common::{collision::footprints_overlap, protocol::Obstacle, rng::SeededRng};

// Check whether an XZ point lies inside the spawn clear zone
#[must_use]
pub fn in_clear_zone(x: f32, z: f32) -> bool {
    Vec2::new(x, z).length() < CLEAR_ZONE_RADIUS
}

// Check a candidate box footprint against every placed obstacle
#[must_use]
pub fn overlaps_placed(pos: Vec3, size: Vec3, placed: &[Obstacle], padding: f32) -> bool {
    placed
        .iter()
        .any(|obstacle| footprints_overlap(pos, size, obstacle.pos, obstacle.size, padding))
}

pub fn pick_color(rng: &mut SeededRng, palette: &[&str]) -> String {
    palette[rng.index(palette.len())].to_string()
}

// Box standing on the floor (y = 0) at the given XZ position
#[must_use]
pub fn floor_box(id: String, x: f32, z: f32, size: Vec3, color: String) -> Obstacle {
    Obstacle {
        id,
        pos: Vec3::new(x, size.y / 2.0, z),
        size,
        color,
        rotation: None,
    }
}

pub fn sample(rng: &mut SeededRng, range: (f32, f32)) -> f32 {
    rng.range(range.0, range.1)
}

pub fn sample_int(rng: &mut SeededRng, range: (i32, i32)) -> i32 {
    rng.int_range(range.0, range.1)
}

// Uniform in [-spread, spread)
pub fn spread(rng: &mut SeededRng, spread: f32) -> f32 {
    rng.range(-spread, spread)
}
