#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use bevy_ecs::component::Component;
use bevy_math::{Vec2, Vec3};

// Macro to reduce boilerplate for plain data structs
macro_rules! message {
    ($(#[$meta:meta])* struct $name:ident $body:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
        pub struct $name $body
    };
}

// ============================================================================
// Identity
// ============================================================================

// Stable per-session entity identifier, never reused
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Component)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct PlayerId(pub String);

impl PlayerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who drives an entity's movement.
///
/// `Remote` entities belong to other humans; their positions arrive through roster merges and the
/// simulation only runs tagging and immunity for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Control {
    Local,
    Bot,
    Remote,
}

// ============================================================================
// Map
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum MapMode {
    #[default]
    Arena,
    Platformer,
}

impl MapMode {
    // Mode a joining client derives from the room seed
    #[must_use]
    pub const fn for_seed(seed: i64) -> Self {
        if seed.rem_euclid(3) == 0 { Self::Platformer } else { Self::Arena }
    }

    #[must_use]
    pub const fn is_platformer(self) -> bool {
        matches!(self, Self::Platformer)
    }

    // Gameplay plane: XZ for the arena, XY for the side-scrolling platformer
    #[must_use]
    pub const fn plane(self, v: Vec3) -> Vec2 {
        match self {
            Self::Arena => Vec2::new(v.x, v.z),
            Self::Platformer => Vec2::new(v.x, v.y),
        }
    }

    #[must_use]
    pub fn plane_distance(self, a: Vec3, b: Vec3) -> f32 {
        self.plane(a).distance(self.plane(b))
    }
}

message! {
/// Static box in the obstacle field. `pos` is the center and `size` the full extents; `rotation`
/// is cosmetic and never read by collision.
struct Obstacle {
    pub id: String,
    pub pos: Vec3,
    pub size: Vec3,
    pub color: String,
    pub rotation: Option<Vec3>,
}
}

impl Obstacle {
    #[must_use]
    pub const fn half_x(&self) -> f32 {
        self.size.x / 2.0
    }

    #[must_use]
    pub const fn half_z(&self) -> f32 {
        self.size.z / 2.0
    }

    // Y of the top face
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }
}

message! {
// Decorative wall attachment point; never consulted by physics.
struct PosterAnchor {
    pub pos: Vec3,
    pub yaw: f32,
    pub photo: usize,
}
}

message! {
struct MapLayout {
    pub mode: MapMode,
    pub seed: i64,
    pub obstacles: Vec<Obstacle>,
    pub posters: Vec<PosterAnchor>,
}
}

// ============================================================================
// Entities
// ============================================================================

message! {
/// Per-frame snapshot of one entity as seen by the front end.
struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub pos: Vec3,
    pub vel_y: f32,
    pub grounded: bool,
    pub is_it: bool,
    pub control: Control,
    pub immunity: f32, // seconds of tag immunity left
    pub yaw: f32,      // radians
}
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>, control: Control, pos: Vec3) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            pos,
            vel_y: 0.0,
            grounded: false,
            is_it: false,
            control,
            immunity: 0.0,
            yaw: 0.0,
        }
    }

    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self.control, Control::Local)
    }

    #[must_use]
    pub const fn is_bot(&self) -> bool {
        matches!(self.control, Control::Bot)
    }
}

// ============================================================================
// Frame Input / Output
// ============================================================================

message! {
/// Movement intent of the locally controlled entity for one frame. `forward` and `strafe` are in
/// [-1, 1]; `yaw` is the current facing angle in radians.
struct ControlIntent {
    pub forward: f32,
    pub strafe: f32,
    pub jump: bool,
    pub yaw: f32,
}
}

impl Default for ControlIntent {
    fn default() -> Self {
        Self {
            forward: 0.0,
            strafe: 0.0,
            jump: false,
            yaw: 0.0,
        }
    }
}

message! {
struct TagEvent {
    pub tagger: PlayerId,
    pub tagged: PlayerId,
}
}

message! {
// Result of the one-time round end computation.
struct RoundOutcome {
    pub winners: Vec<PlayerId>,
    pub final_players: Vec<Player>,
}
}
