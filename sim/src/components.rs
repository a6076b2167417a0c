use bevy_ecs::prelude::Component;
use bevy_math::{Vec2, Vec3};

// ============================================================================
// Bevy Components
// ============================================================================

/// Cosmetic identity, fixed for the round
#[derive(Component, Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub color: String,
}

/// Physical state integrated every frame
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Kinematics {
    pub pos: Vec3,
    pub vel_y: f32,
    pub grounded: bool,
    pub yaw: f32,
}

/// IT flag plus seconds of post-tag immunity
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TagState {
    pub is_it: bool,
    pub immunity: f32,
}

impl TagState {
    // Can be tagged or chased right now
    #[must_use]
    pub fn is_tag_target(&self) -> bool {
        !self.is_it && self.immunity <= 0.0
    }
}

/// Position in the roster; fixes iteration order for tagging and snapshots
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RosterIndex(pub u32);

/// Movement wanted this frame. Arena: world XZ direction (x, z). Platformer: `dir.x` is the
/// lateral axis in [-1, 1].
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MoveIntent {
    pub dir: Vec2,
    pub jump: bool,
}
