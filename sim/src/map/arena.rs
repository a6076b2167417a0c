use bevy_math::Vec3;
use std::f32::consts::TAU;

use super::helpers::{floor_box, in_clear_zone, overlaps_placed, pick_color, sample, sample_int, spread};
use crate::constants::*;
use common::{protocol::Obstacle, rng::SeededRng};

// ============================================================================
// Arena Obstacles
// ============================================================================

/// Place every arena archetype in a fixed order, then close the field with boundary walls.
///
/// Each archetype draws its own randomized target count; a candidate that lands in the clear zone
/// or overlaps an earlier footprint is dropped, so a bad draw only thins the field out.
pub fn generate_obstacles(rng: &mut SeededRng) -> Vec<Obstacle> {
    let mut obstacles = Vec::new();

    place_corridors(rng, &mut obstacles);
    place_pillar_groups(rng, &mut obstacles);
    place_lwalls(rng, &mut obstacles);
    place_wonky_blocks(rng, &mut obstacles);
    place_boundary_walls(rng, &mut obstacles);

    obstacles
}

fn place_corridors(rng: &mut SeededRng, obstacles: &mut Vec<Obstacle>) {
    let target = sample_int(rng, CORRIDOR_COUNT);
    let mut placed = 0;

    for attempt in 0..target * CORRIDOR_ATTEMPTS_PER_WALL {
        if placed >= target {
            break;
        }

        let horizontal = rng.flip();
        let length = sample(rng, CORRIDOR_LENGTH);
        let height = sample(rng, CORRIDOR_HEIGHT);
        let width = sample(rng, CORRIDOR_WIDTH);
        let size = if horizontal {
            Vec3::new(length, height, width)
        } else {
            Vec3::new(width, height, length)
        };
        let x = spread(rng, CORRIDOR_SPREAD);
        let z = spread(rng, CORRIDOR_SPREAD);

        if in_clear_zone(x, z) {
            continue;
        }
        let pos = Vec3::new(x, height / 2.0, z);
        if overlaps_placed(pos, size, obstacles, CORRIDOR_PADDING) {
            continue;
        }

        let color = pick_color(rng, &OBSTACLE_COLORS);
        obstacles.push(floor_box(format!("corridor-{attempt}"), x, z, size, color));
        placed += 1;
    }
}

fn place_pillar_groups(rng: &mut SeededRng, obstacles: &mut Vec<Obstacle>) {
    let groups = sample_int(rng, PILLAR_GROUP_COUNT);

    for group in 0..groups {
        let center_x = spread(rng, PILLAR_GROUP_SPREAD);
        let center_z = spread(rng, PILLAR_GROUP_SPREAD);
        if in_clear_zone(center_x, center_z) {
            continue;
        }

        let pillars = sample_int(rng, PILLARS_PER_GROUP);
        for pillar in 0..pillars {
            let x = center_x + spread(rng, PILLAR_SCATTER);
            let z = center_z + spread(rng, PILLAR_SCATTER);
            let height = sample(rng, PILLAR_HEIGHT);
            let width = sample(rng, PILLAR_WIDTH);

            if in_clear_zone(x, z) {
                continue;
            }
            let size = Vec3::new(width, height, width);
            let pos = Vec3::new(x, height / 2.0, z);
            if overlaps_placed(pos, size, obstacles, PILLAR_PADDING) {
                continue;
            }

            let color = pick_color(rng, &OBSTACLE_COLORS);
            obstacles.push(floor_box(format!("pillar-{group}-{pillar}"), x, z, size, color));
        }
    }
}

// Two boxes: arm A along X, arm B along Z hanging off arm A's +X end.
fn place_lwalls(rng: &mut SeededRng, obstacles: &mut Vec<Obstacle>) {
    let count = sample_int(rng, LWALL_COUNT);

    for index in 0..count {
        let base_x = spread(rng, LWALL_SPREAD);
        let base_z = spread(rng, LWALL_SPREAD);
        if in_clear_zone(base_x, base_z) {
            continue;
        }

        let height = sample(rng, LWALL_HEIGHT);
        let arm = sample(rng, LWALL_ARM);
        let thickness = sample(rng, LWALL_THICKNESS);
        let color = pick_color(rng, &OBSTACLE_COLORS);
        let second_arm = sample(rng, LWALL_SECOND_ARM);

        let size_a = Vec3::new(arm, height, thickness);
        let size_b = Vec3::new(thickness, height, second_arm);
        let (bx, bz) = (base_x + arm / 2.0, base_z + second_arm / 2.0);
        if in_clear_zone(bx, bz) {
            continue;
        }

        let pos_a = Vec3::new(base_x, height / 2.0, base_z);
        let pos_b = Vec3::new(bx, height / 2.0, bz);
        if overlaps_placed(pos_a, size_a, obstacles, LWALL_PADDING)
            || overlaps_placed(pos_b, size_b, obstacles, LWALL_PADDING)
        {
            continue;
        }

        obstacles.push(floor_box(format!("lwall-{index}-a"), base_x, base_z, size_a, color.clone()));
        obstacles.push(floor_box(format!("lwall-{index}-b"), bx, bz, size_b, color));
    }
}

fn place_wonky_blocks(rng: &mut SeededRng, obstacles: &mut Vec<Obstacle>) {
    let target = sample_int(rng, WONKY_COUNT);
    let mut placed = 0;

    for attempt in 0..target * WONKY_ATTEMPTS_PER_BLOCK {
        if placed >= target {
            break;
        }

        let size = Vec3::new(sample(rng, WONKY_SIZE), sample(rng, WONKY_SIZE), sample(rng, WONKY_SIZE));
        let x = spread(rng, WONKY_SPREAD);
        let z = spread(rng, WONKY_SPREAD);
        let yaw = rng.range(0.0, TAU);
        let tilt_x = spread(rng, WONKY_TILT);
        let tilt_z = spread(rng, WONKY_TILT);

        if in_clear_zone(x, z) {
            continue;
        }
        let pos = Vec3::new(x, size.y / 2.0, z);
        if overlaps_placed(pos, size, obstacles, WONKY_PADDING) {
            continue;
        }

        let color = pick_color(rng, &OBSTACLE_COLORS);
        let mut block = floor_box(format!("wonky-{attempt}"), x, z, size, color);
        block.rotation = Some(Vec3::new(tilt_x, yaw, tilt_z));
        obstacles.push(block);
        placed += 1;
    }
}

fn place_boundary_walls(rng: &mut SeededRng, obstacles: &mut Vec<Obstacle>) {
    let span = 2.0 * ARENA_HALF_EXTENT + BOUNDARY_THICKNESS;
    let along_x = Vec3::new(span, BOUNDARY_HEIGHT, BOUNDARY_THICKNESS);
    let along_z = Vec3::new(BOUNDARY_THICKNESS, BOUNDARY_HEIGHT, span);

    let walls = [
        ("bound-n", 0.0, -ARENA_HALF_EXTENT, along_x),
        ("bound-s", 0.0, ARENA_HALF_EXTENT, along_x),
        ("bound-w", -ARENA_HALF_EXTENT, 0.0, along_z),
        ("bound-e", ARENA_HALF_EXTENT, 0.0, along_z),
    ];
    for (id, x, z, size) in walls {
        let color = pick_color(rng, &OBSTACLE_COLORS);
        obstacles.push(floor_box(id.to_string(), x, z, size, color));
    }
}
