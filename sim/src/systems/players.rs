use bevy_ecs::prelude::*;
use bevy_math::{Vec2, Vec3};
use bevy_time::Time;

use crate::{
    components::{Kinematics, MoveIntent, TagState},
    config::SimConfig,
    resources::{LocalIntent, ObstacleField},
};
use common::{
    collision::{land_on_ledge, resolve_obstacles},
    constants::*,
    protocol::{Control, ControlIntent, MapMode, Obstacle},
};

// Non-finite axis input counts as released
fn axis(value: f32) -> f32 {
    if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 }
}

fn clamp_to_field(value: f32) -> f32 {
    value.clamp(-MAP_BOUND, MAP_BOUND)
}

/// Hard clamp of a position into the field: |x| and |z| within `MAP_BOUND` in the arena, |x|
/// within `MAP_BOUND` and z pinned to the play plane in the platformer.
#[must_use]
pub fn confine(mode: MapMode, pos: Vec3) -> Vec3 {
    match mode {
        MapMode::Arena => Vec3::new(clamp_to_field(pos.x), pos.y, clamp_to_field(pos.z)),
        MapMode::Platformer => Vec3::new(clamp_to_field(pos.x), pos.y, 0.0),
    }
}

/// Convert the local forward/strafe pair into a world-space move intent.
///
/// Arena: rotate by yaw about the vertical axis (yaw 0 faces -Z) and normalize. Platformer: only
/// the strafe axis moves, and the jump flag passes through.
#[must_use]
pub fn world_intent(mode: MapMode, intent: &ControlIntent, yaw: f32) -> MoveIntent {
    let forward = axis(intent.forward);
    let strafe = axis(intent.strafe);

    match mode {
        MapMode::Arena => {
            let (sin, cos) = yaw.sin_cos();
            let dir = Vec2::new(strafe * cos - forward * sin, -strafe * sin - forward * cos);
            MoveIntent {
                dir: dir.normalize_or_zero(),
                jump: false,
            }
        }
        MapMode::Platformer => MoveIntent {
            dir: Vec2::new(strafe, 0.0),
            jump: intent.jump,
        },
    }
}

#[must_use]
pub fn move_speed(control: Control, tag: &TagState) -> Option<f32> {
    let base = match control {
        Control::Local => PLAYER_SPEED,
        Control::Bot => BOT_SPEED,
        Control::Remote => return None,
    };
    Some(if tag.is_it { base * (1.0 + IT_SPEED_BONUS) } else { base })
}

/// One arena frame: move, clamp, push out of obstacles, clamp again. Always on the floor.
#[must_use]
pub fn step_arena(kin: Kinematics, dir: Vec2, speed: f32, delta: f32, obstacles: &[Obstacle]) -> Kinematics {
    let dir = dir.normalize_or_zero();
    let candidate = Vec3::new(
        clamp_to_field((dir.x * speed).mul_add(delta, kin.pos.x)),
        ARENA_FLOOR_Y,
        clamp_to_field((dir.y * speed).mul_add(delta, kin.pos.z)),
    );
    let resolved = resolve_obstacles(candidate, obstacles, PLAYER_RADIUS).pos;

    Kinematics {
        pos: Vec3::new(clamp_to_field(resolved.x), ARENA_FLOOR_Y, clamp_to_field(resolved.z)),
        vel_y: 0.0,
        grounded: true,
        yaw: kin.yaw,
    }
}

/// One platformer frame: lateral move, jump impulse when grounded, gravity, then ledge landing
/// with the absolute floor as a fallback. Z is pinned to the play plane.
#[must_use]
pub fn step_platformer(kin: Kinematics, intent: &MoveIntent, speed: f32, delta: f32, obstacles: &[Obstacle]) -> Kinematics {
    let mut vel_y = kin.vel_y;
    if intent.jump && kin.grounded {
        vel_y = JUMP_VELOCITY;
    }
    vel_y -= GRAVITY * delta;

    let x = clamp_to_field((axis(intent.dir.x) * speed).mul_add(delta, kin.pos.x));
    let new_y = vel_y.mul_add(delta, kin.pos.y);
    let prev_bottom = kin.pos.y - PLAYER_HALF_HEIGHT;
    let new_bottom = new_y - PLAYER_HALF_HEIGHT;

    let (y, vel_y, grounded) = if let Some(top) = land_on_ledge(prev_bottom, new_bottom, x, obstacles) {
        (top + PLAYER_HALF_HEIGHT, 0.0, true)
    } else if new_y < PLAYER_HALF_HEIGHT {
        (PLAYER_HALF_HEIGHT, 0.0, true)
    } else {
        (new_y, vel_y, false)
    };

    Kinematics {
        pos: Vec3::new(x, y, 0.0),
        vel_y,
        grounded,
        yaw: kin.yaw,
    }
}

// ============================================================================
// Local Intent System
// ============================================================================

pub fn local_intent_system(
    config: Res<SimConfig>,
    local: Res<LocalIntent>,
    mut query: Query<(&Control, &mut Kinematics, &mut MoveIntent)>,
) {
    for (control, mut kin, mut intent) in &mut query {
        if *control != Control::Local {
            continue;
        }
        if local.0.yaw.is_finite() {
            kin.yaw = local.0.yaw;
        }
        *intent = world_intent(config.mode, &local.0, kin.yaw);
    }
}

// ============================================================================
// Players Movement System
// ============================================================================

// Integrates local and bot entities; remote entities only move through roster merges
pub fn players_movement_system(
    time: Res<Time>,
    config: Res<SimConfig>,
    field: Res<ObstacleField>,
    mut query: Query<(&Control, &TagState, &MoveIntent, &mut Kinematics)>,
) {
    let delta = time.delta_secs();

    for (control, tag, intent, mut kin) in &mut query {
        let Some(speed) = move_speed(*control, tag) else {
            continue;
        };

        *kin = match config.mode {
            MapMode::Arena => step_arena(*kin, intent.dir, speed, delta, &field.0),
            MapMode::Platformer => step_platformer(*kin, intent, speed, delta, &field.0),
        };
    }
}
