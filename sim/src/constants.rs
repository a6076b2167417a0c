use common::constants::{MAP_BOUND, MAX_LEDGE_GAP, PLAYER_RADIUS};

// ============================================================================
// Arena Layout
// ============================================================================

pub const BOUNDARY_HEIGHT: f32 = 5.0;
pub const BOUNDARY_THICKNESS: f32 = 1.5;

// Boundary wall centers; inner faces sit one player radius outside the clamp square
pub const ARENA_HALF_EXTENT: f32 = MAP_BOUND + PLAYER_RADIUS + BOUNDARY_THICKNESS / 2.0;

// Nothing but the boundary may be centered inside this circle around the origin
pub const CLEAR_ZONE_RADIUS: f32 = 6.0;

// Corridor walls
pub const CORRIDOR_COUNT: (i32, i32) = (10, 16);
pub const CORRIDOR_ATTEMPTS_PER_WALL: i32 = 6;
pub const CORRIDOR_LENGTH: (f32, f32) = (6.0, 14.0);
pub const CORRIDOR_HEIGHT: (f32, f32) = (3.0, 5.0);
pub const CORRIDOR_WIDTH: (f32, f32) = (0.5, 1.2);
pub const CORRIDOR_SPREAD: f32 = MAP_BOUND - 2.0;
pub const CORRIDOR_PADDING: f32 = 1.0;

// Pillar clusters
pub const PILLAR_GROUP_COUNT: (i32, i32) = (4, 8);
pub const PILLARS_PER_GROUP: (i32, i32) = (3, 6);
pub const PILLAR_GROUP_SPREAD: f32 = MAP_BOUND - 4.0;
pub const PILLAR_SCATTER: f32 = 4.0; // max offset from the cluster center
pub const PILLAR_HEIGHT: (f32, f32) = (2.5, 5.0);
pub const PILLAR_WIDTH: (f32, f32) = (0.8, 1.8);
pub const PILLAR_PADDING: f32 = 0.5;

// L-shaped walls
pub const LWALL_COUNT: (i32, i32) = (6, 10);
pub const LWALL_SPREAD: f32 = MAP_BOUND - 3.0;
pub const LWALL_HEIGHT: (f32, f32) = (3.0, 5.0);
pub const LWALL_ARM: (f32, f32) = (4.0, 8.0);
pub const LWALL_SECOND_ARM: (f32, f32) = (3.0, 6.0);
pub const LWALL_THICKNESS: (f32, f32) = (0.6, 1.2);
pub const LWALL_PADDING: f32 = 0.5;

// Tilted blocks
pub const WONKY_COUNT: (i32, i32) = (8, 14);
pub const WONKY_ATTEMPTS_PER_BLOCK: i32 = 4;
pub const WONKY_SIZE: (f32, f32) = (1.5, 4.0);
pub const WONKY_SPREAD: f32 = MAP_BOUND - 2.0;
pub const WONKY_TILT: f32 = 0.3; // radians, X and Z
pub const WONKY_PADDING: f32 = 0.8;

// Poster anchors
pub const POSTER_HEIGHT: f32 = 1.8;
pub const POSTER_INSET: f32 = 0.8;
pub const POSTER_SPREAD_RATIO: f32 = 0.6; // fraction of the half extent used along a boundary wall
pub const POSTER_PHOTOS: usize = 4;
pub const CORRIDOR_POSTERS_MAX: usize = 4;
pub const POSTER_MIN_WALL_LENGTH: f32 = 6.0;

pub const OBSTACLE_COLORS: [&str; 10] = [
    "#0a1f6e", "#1a0a5e", "#0a3a6e", "#2a0a5e", "#0a4a5e", "#3a0a6e", "#0a2a4e", "#1a3a5e", "#0a5a6e", "#2a1a6e",
];

// ============================================================================
// Platformer Layout
// ============================================================================

pub const GROUND_SLAB_SIZE: (f32, f32, f32) = (45.0, 0.4, 2.0);
pub const GROUND_SLAB_COLOR: &str = "#2a1f4a";

pub const PLATFORM_COLUMNS: usize = 9;
pub const PLATFORM_X_RANGE: (f32, f32) = (-22.0, 22.0);
pub const LEDGES_PER_COLUMN: usize = 3;
pub const LEDGE_THICKNESS: f32 = 0.4;
pub const LEDGE_DEPTH: f32 = 2.0;
pub const FIRST_LEDGE_TOP: (f32, f32) = (1.5, 3.0);
pub const LEDGE_GAP: (f32, f32) = (2.5, MAX_LEDGE_GAP);
pub const LEDGE_TOP_MAX: f32 = 10.0;
pub const LEDGE_JITTER_RATIO: f32 = 0.3; // of the column width

// Width tiers by ledge top: lower ledges are wider
pub const LOW_LEDGE_TOP: f32 = 4.0;
pub const HIGH_LEDGE_TOP: f32 = 7.0;
pub const LOW_LEDGE_WIDTH: (f32, f32) = (4.0, 8.0);
pub const MID_LEDGE_WIDTH: (f32, f32) = (3.0, 6.0);
pub const HIGH_LEDGE_WIDTH: (f32, f32) = (2.0, 4.5);

pub const PLATFORM_COLORS: [&str; 8] = [
    "#00ffcc", "#ff44aa", "#ffee00", "#44aaff", "#ff6600", "#cc44ff", "#00ff66", "#ff2255",
];

// ============================================================================
// Roster
// ============================================================================

pub const BOT_NAMES: [&str; 4] = ["Alpha", "Beta", "Gamma", "Delta"];
pub const PLAYER_COLORS: [&str; 4] = ["#00ccff", "#aa44ff", "#ffcc00", "#44ff88"];
pub const SPAWN_JITTER: f32 = 4.0; // +- on x
pub const PLATFORMER_SPAWN_Y: f32 = 2.0;

// ============================================================================
// Bot AI
// ============================================================================

// Chase target lock before weighted reselection (seconds)
pub const BOT_LOCK_DURATION: (f32, f32) = (2.5, 5.0);

// Reselection weight is 1 / (distance + BOT_PICK_DISTANCE_BIAS)
pub const BOT_PICK_DISTANCE_BIAS: f32 = 2.0;

// Weight multiplier for the target that was locked until now
pub const BOT_PICK_REPEAT_PENALTY: f32 = 0.35;

// How far ahead the chaser aims along the target's observed velocity (seconds)
pub const BOT_LEAD_TIME: f32 = 0.45;

// Candidate headings probed around the desired direction
pub const BOT_HEADING_SAMPLES: usize = 12;

// Shortest probe step when testing a heading against obstacles
pub const BOT_PROBE_MIN_STEP: f32 = 0.6;

// Max lateral noise added to a fleeing bot's direction (arena)
pub const BOT_FLEE_NOISE: f32 = 0.35;

// Stuck detection: slower than this for longer than BOT_STUCK_TIME triggers an escape
pub const BOT_STUCK_SPEED: f32 = 0.5; // meters per second
pub const BOT_STUCK_TIME: f32 = 0.7; // seconds
pub const BOT_ESCAPE_DURATION: (f32, f32) = (0.5, 0.6);

// Wandering when there is nobody to chase
pub const BOT_WANDER_RADIUS: f32 = 12.0; // arena circle around the origin
pub const BOT_WANDER_SWING: f32 = 15.0; // platformer left/right turn points
pub const BOT_WANDER_ARRIVE: f32 = 1.0;

// Platformer jump countdown (seconds)
pub const BOT_JUMP_INTERVAL: (f32, f32) = (1.0, 2.0);
