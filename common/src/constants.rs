// ============================================================================
// Floating-Point Comparisons
// ============================================================================

// Small value for floating-point comparisons (near-zero checks, division guards).
pub const PHYSICS_EPSILON: f32 = 1e-4;

// ============================================================================
// Field
// ============================================================================

// Hard clamp for |x| and |z| of every entity center
pub const MAP_BOUND: f32 = 21.0;

// Resting height of an arena entity center
pub const ARENA_FLOOR_Y: f32 = PLAYER_HALF_HEIGHT;

// ============================================================================
// Player
// ============================================================================

// Dimensions (meters)
pub const PLAYER_RADIUS: f32 = 0.5; // circular footprint used against obstacles
pub const PLAYER_HALF_HEIGHT: f32 = 0.5; // center to feet

// Speeds (meters per second)
pub const PLAYER_SPEED: f32 = 5.0;
pub const BOT_SPEED: f32 = 4.5;
pub const IT_SPEED_BONUS: f32 = 0.15; // IT holders move this much faster

// ============================================================================
// Platformer Physics
// ============================================================================

pub const GRAVITY: f32 = 15.0; // meters per second squared
pub const JUMP_VELOCITY: f32 = 13.0; // meters per second

// Apex of a jump from standing: v^2 / 2g
pub const MAX_JUMP_HEIGHT: f32 = JUMP_VELOCITY * JUMP_VELOCITY / (2.0 * GRAVITY);

// Largest vertical distance between stacked ledges the generator may produce
pub const MAX_LEDGE_GAP: f32 = 4.5;

const _: () = assert!(MAX_LEDGE_GAP < MAX_JUMP_HEIGHT, "ledge gap must stay jumpable");

pub const LEDGE_LANDING_MARGIN: f32 = 0.3; // horizontal slack past the ledge edge
pub const LEDGE_LANDING_TOLERANCE: f32 = 0.01; // feet may start this far below the top

// ============================================================================
// Tagging
// ============================================================================

pub const TAG_RADIUS: f32 = 1.8; // meters, center to center
pub const TAG_IMMUNITY: f32 = 3.0; // seconds granted to the previous IT holder

// ============================================================================
// Frame Timing
// ============================================================================

// Deltas above this are clamped (e.g. after the host was suspended)
pub const MAX_FRAME_DELTA: f32 = 0.1; // seconds

// ============================================================================
// Round
// ============================================================================

pub const MAX_ENTITIES: usize = 4;
pub const DEFAULT_ROUND_SECONDS: f32 = 100.0;
