use bevy_ecs::entity::Entity;
use bevy_math::{Vec2, Vec3};
use rand::Rng;

use crate::{
    components::TagState,
    constants::{BOT_LEAD_TIME, BOT_PICK_DISTANCE_BIAS, BOT_PICK_REPEAT_PENALTY},
    resources::MotionTracker,
};
use common::{
    constants::MAP_BOUND,
    protocol::{Control, MapMode, PlayerId},
};

// Read-only view of one roster entry as the bots see it at the start of a frame
#[derive(Debug, Clone)]
pub struct Observed {
    pub entity: Entity,
    pub id: PlayerId,
    pub control: Control,
    pub pos: Vec3,
    pub grounded: bool,
    pub tag: TagState,
}

// Everyone an IT bot may chase right now
#[must_use]
pub fn chase_candidates<'a>(me: &PlayerId, roster: &'a [Observed]) -> Vec<&'a Observed> {
    roster
        .iter()
        .filter(|other| other.id != *me && other.tag.is_tag_target())
        .collect()
}

#[must_use]
pub fn pick_weight(distance: f32, is_current: bool) -> f32 {
    let weight = 1.0 / (distance.max(0.0) + BOT_PICK_DISTANCE_BIAS);
    if is_current { weight * BOT_PICK_REPEAT_PENALTY } else { weight }
}

/// Weighted random pick among `candidates` (must be non-empty): closer targets are likelier, and
/// the target locked until now is penalized so chasers rotate between victims.
pub fn pick_weighted<R: Rng>(
    rng: &mut R,
    mode: MapMode,
    from: Vec3,
    candidates: &[&Observed],
    current: Option<&PlayerId>,
) -> usize {
    let weights: Vec<f32> = candidates
        .iter()
        .map(|c| pick_weight(mode.plane_distance(from, c.pos), current == Some(&c.id)))
        .collect();
    let total: f32 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return 0;
    }

    let mut roll = rng.random_range(0.0..total);
    for (index, weight) in weights.iter().enumerate() {
        if roll < *weight {
            return index;
        }
        roll -= weight;
    }
    weights.len().saturating_sub(1)
}

// Where the chaser aims: target position pushed ahead along its observed velocity, kept in bounds
#[must_use]
pub fn lead_point(mode: MapMode, target: &Observed, tracker: &MotionTracker) -> Vec2 {
    let lead = target.pos + tracker.velocity_of(&target.id) * BOT_LEAD_TIME;
    let aim = mode.plane(lead);
    match mode {
        MapMode::Arena => aim.clamp(Vec2::splat(-MAP_BOUND), Vec2::splat(MAP_BOUND)),
        MapMode::Platformer => Vec2::new(aim.x.clamp(-MAP_BOUND, MAP_BOUND), aim.y),
    }
}
