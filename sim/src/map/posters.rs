use bevy_math::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::constants::*;
use common::{
    protocol::{Obstacle, PosterAnchor},
    rng::SeededRng,
};

// ============================================================================
// Poster Anchors
// ============================================================================

/// Decorative anchors: one per boundary wall, then up to `CORRIDOR_POSTERS_MAX` on long corridor
/// walls. Draws from the same stream after the obstacles so they follow the seed too.
pub fn generate_posters(rng: &mut SeededRng, obstacles: &[Obstacle]) -> Vec<PosterAnchor> {
    let mut posters = boundary_posters(rng);

    let long_walls = obstacles.iter().filter(|o| {
        o.id.starts_with("corridor-") && (o.size.x > POSTER_MIN_WALL_LENGTH || o.size.z > POSTER_MIN_WALL_LENGTH)
    });

    for (slot, wall) in long_walls.take(CORRIDOR_POSTERS_MAX).enumerate() {
        posters.push(corridor_poster(rng, wall, slot % POSTER_PHOTOS));
    }

    posters
}

fn boundary_posters(rng: &mut SeededRng) -> Vec<PosterAnchor> {
    let reach = ARENA_HALF_EXTENT * POSTER_SPREAD_RATIO;
    let face = ARENA_HALF_EXTENT - POSTER_INSET;

    let north = rng.range(-reach, reach);
    let south = rng.range(-reach, reach);
    let west = rng.range(-reach, reach);
    let east = rng.range(-reach, reach);

    vec![
        PosterAnchor {
            pos: Vec3::new(north, POSTER_HEIGHT, -face),
            yaw: 0.0,
            photo: 0,
        },
        PosterAnchor {
            pos: Vec3::new(south, POSTER_HEIGHT, face),
            yaw: PI,
            photo: 1,
        },
        PosterAnchor {
            pos: Vec3::new(-face, POSTER_HEIGHT, west),
            yaw: FRAC_PI_2,
            photo: 2,
        },
        PosterAnchor {
            pos: Vec3::new(face, POSTER_HEIGHT, east),
            yaw: -FRAC_PI_2,
            photo: 3,
        },
    ]
}

// Midpoint of one of the wall's long faces, facing away from the wall
fn corridor_poster(rng: &mut SeededRng, wall: &Obstacle, photo: usize) -> PosterAnchor {
    let positive_face = rng.flip();

    if wall.size.x >= wall.size.z {
        let z = if positive_face { wall.pos.z + wall.half_z() } else { wall.pos.z - wall.half_z() };
        PosterAnchor {
            pos: Vec3::new(wall.pos.x, POSTER_HEIGHT, z),
            yaw: if positive_face { PI } else { 0.0 },
            photo,
        }
    } else {
        let x = if positive_face { wall.pos.x + wall.half_x() } else { wall.pos.x - wall.half_x() };
        PosterAnchor {
            pos: Vec3::new(x, POSTER_HEIGHT, wall.pos.z),
            yaw: if positive_face { -FRAC_PI_2 } else { FRAC_PI_2 },
            photo,
        }
    }
}
