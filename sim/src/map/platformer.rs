use bevy_math::Vec3;

use super::helpers::{pick_color, sample};
use crate::constants::*;
use common::{protocol::Obstacle, rng::SeededRng};

// ============================================================================
// Platformer Ledges
// ============================================================================

// Ledge width tier by top height
fn width_range(top: f32) -> (f32, f32) {
    if top < LOW_LEDGE_TOP {
        LOW_LEDGE_WIDTH
    } else if top > HIGH_LEDGE_TOP {
        HIGH_LEDGE_WIDTH
    } else {
        MID_LEDGE_WIDTH
    }
}

/// Stacked ledge tops for one column. Every gap (including the first ledge above the floor) is at
/// most `MAX_LEDGE_GAP`, so each ledge is reachable with a single jump.
pub fn column_tops(rng: &mut SeededRng) -> [f32; LEDGES_PER_COLUMN] {
    let mut tops = [0.0; LEDGES_PER_COLUMN];
    tops[0] = sample(rng, FIRST_LEDGE_TOP);
    for i in 1..LEDGES_PER_COLUMN {
        tops[i] = (tops[i - 1] + sample(rng, LEDGE_GAP)).min(LEDGE_TOP_MAX);
    }
    tops
}

pub fn generate_obstacles(rng: &mut SeededRng) -> Vec<Obstacle> {
    let (ground_x, ground_y, ground_z) = GROUND_SLAB_SIZE;
    let mut obstacles = vec![Obstacle {
        id: "platform-ground".to_string(),
        pos: Vec3::new(0.0, ground_y / 2.0, 0.0),
        size: Vec3::new(ground_x, ground_y, ground_z),
        color: GROUND_SLAB_COLOR.to_string(),
        rotation: None,
    }];

    let (x_min, x_max) = PLATFORM_X_RANGE;
    let column_width = (x_max - x_min) / PLATFORM_COLUMNS as f32;
    let jitter = column_width * LEDGE_JITTER_RATIO;
    let mut index = 0;

    for column in 0..PLATFORM_COLUMNS {
        let center_x = (column as f32).mul_add(column_width, x_min) + column_width / 2.0;

        for top in column_tops(rng) {
            let width = sample(rng, width_range(top));
            let x = center_x + rng.range(-jitter, jitter);
            let color = pick_color(rng, &PLATFORM_COLORS);

            obstacles.push(Obstacle {
                id: format!("platform-{index}"),
                pos: Vec3::new(x, top - LEDGE_THICKNESS / 2.0, 0.0),
                size: Vec3::new(width, LEDGE_THICKNESS, LEDGE_DEPTH),
                color,
                rotation: None,
            });
            index += 1;
        }
    }

    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::{MAX_LEDGE_GAP, PHYSICS_EPSILON};

    #[test]
    fn ground_slab_first_then_full_columns() {
        let mut rng = SeededRng::new(11);
        let obstacles = generate_obstacles(&mut rng);
        assert_eq!(obstacles.len(), 1 + PLATFORM_COLUMNS * LEDGES_PER_COLUMN);
        assert_eq!(obstacles[0].id, "platform-ground");
        assert_eq!(obstacles[1].id, "platform-0");
        assert_eq!(obstacles.last().map(|o| o.id.as_str()), Some("platform-26"));
    }

    #[test]
    fn column_tops_climb_within_jump_reach() {
        let mut rng = SeededRng::new(31337);
        for _ in 0..500 {
            let tops = column_tops(&mut rng);
            assert!(tops[0] <= MAX_LEDGE_GAP);
            for pair in tops.windows(2) {
                let gap = pair[1] - pair[0];
                assert!((0.0..=MAX_LEDGE_GAP + PHYSICS_EPSILON).contains(&gap), "gap {gap}");
            }
            assert!(tops.iter().all(|t| *t <= LEDGE_TOP_MAX));
        }
    }

    #[test]
    fn higher_ledges_are_narrower() {
        assert_eq!(width_range(2.0), LOW_LEDGE_WIDTH);
        assert_eq!(width_range(5.5), MID_LEDGE_WIDTH);
        assert_eq!(width_range(9.0), HIGH_LEDGE_WIDTH);
    }

    #[test]
    fn ledges_stay_in_plane() {
        let mut rng = SeededRng::new(4);
        assert!(generate_obstacles(&mut rng).iter().all(|o| o.pos.z == 0.0));
    }
}
