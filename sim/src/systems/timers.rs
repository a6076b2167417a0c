use bevy_ecs::prelude::*;
use bevy_time::Time;

use crate::{components::TagState, resources::RoundClock};

// ============================================================================
// Round Clock System
// ============================================================================

pub fn round_clock_system(time: Res<Time>, mut clock: ResMut<RoundClock>) {
    if clock.active {
        clock.remaining = (clock.remaining - time.delta_secs()).max(0.0);
    }
}

// ============================================================================
// Tag Immunity System
// ============================================================================

// Immunity only ever counts down here; the tag system is the one place that grants it
pub fn tag_immunity_system(time: Res<Time>, mut query: Query<&mut TagState>) {
    let delta = time.delta_secs();

    for mut tag in &mut query {
        if tag.immunity > 0.0 {
            tag.immunity = (tag.immunity - delta).max(0.0);
        }
    }
}
