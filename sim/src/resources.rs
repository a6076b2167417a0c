use bevy_ecs::prelude::Resource;
use bevy_math::{Vec2, Vec3};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashMap;

use crate::constants::BOT_JUMP_INTERVAL;
use common::protocol::{ControlIntent, Obstacle, PlayerId, TagEvent};

// ============================================================================
// Bevy Resources
// ============================================================================

// Static geometry for the round, read-only once the round starts
#[derive(Resource, Default)]
pub struct ObstacleField(pub Vec<Obstacle>);

// Intent of the locally controlled entity for the current frame
#[derive(Resource, Default)]
pub struct LocalIntent(pub ControlIntent);

// Tags fired during the current step
#[derive(Resource, Default)]
pub struct TagLog(pub Vec<TagEvent>);

#[derive(Resource, Debug, Clone, Copy)]
pub struct RoundClock {
    pub remaining: f32,
    pub active: bool,
}

impl RoundClock {
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

// Randomness for bot decisions, seeded per simulation
#[derive(Resource)]
pub struct BotRng(pub StdRng);

impl BotRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// ============================================================================
// Motion Tracking
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Tracked {
    pub pos: Vec3,
    pub vel: Vec3,
}

// Last position and observed per-axis velocity of every entity, used for chase lead
#[derive(Resource, Default)]
pub struct MotionTracker(pub HashMap<PlayerId, Tracked>);

impl MotionTracker {
    #[must_use]
    pub fn velocity_of(&self, id: &PlayerId) -> Vec3 {
        self.0.get(id).map_or(Vec3::ZERO, |tracked| tracked.vel)
    }
}

// ============================================================================
// Bot Bookkeeping
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    Chase,
    Flee,
    Wander,
    Escape,
}

// Per-bot AI state (owned by the bot systems)
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub mode: BotMode,
    pub target: Option<PlayerId>,
    pub lock_timer: f32,
    pub stuck_timer: f32,
    pub last_pos: Vec3,
    pub last_delta: f32, // frame delta that produced the move from `last_pos`
    pub escape_timer: f32,
    pub escape_dir: Vec2,
    pub jump_timer: f32,
    pub wander_phase: f32, // arena: angle on the wander circle
    pub wander_right: bool, // platformer: current swing direction
    pub was_it: bool,
}

impl BotInfo {
    pub fn new<R: Rng>(pos: Vec3, is_it: bool, rng: &mut R) -> Self {
        Self {
            mode: BotMode::Wander,
            target: None,
            lock_timer: 0.0,
            stuck_timer: 0.0,
            last_pos: pos,
            last_delta: 0.0,
            escape_timer: 0.0,
            escape_dir: Vec2::ZERO,
            jump_timer: rng.random_range(BOT_JUMP_INTERVAL.0..BOT_JUMP_INTERVAL.1),
            wander_phase: pos.z.atan2(pos.x),
            wander_right: pos.x <= 0.0,
            was_it: is_it,
        }
    }

    // Drop any chase lock so the next frame reselects
    pub fn clear_target(&mut self) {
        self.target = None;
        self.lock_timer = 0.0;
    }
}

#[derive(Resource, Default)]
pub struct BotMap(pub HashMap<PlayerId, BotInfo>);

impl BotMap {
    // Clear the chase lock of a bot and of every bot chasing it
    pub fn invalidate(&mut self, id: &PlayerId) {
        for (bot_id, info) in &mut self.0 {
            if bot_id == id || info.target.as_ref() == Some(id) {
                info.clear_target();
            }
        }
    }
}
