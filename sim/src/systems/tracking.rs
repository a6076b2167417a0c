use bevy_ecs::prelude::*;
use bevy_math::Vec3;
use bevy_time::Time;

use crate::{
    components::Kinematics,
    resources::{MotionTracker, Tracked},
};
use common::protocol::PlayerId;

// ============================================================================
// Motion Tracking System
// ============================================================================

// Record where everyone ended the frame and how fast they got there
pub fn motion_tracking_system(
    time: Res<Time>,
    mut tracker: ResMut<MotionTracker>,
    query: Query<(&PlayerId, &Kinematics)>,
) {
    let delta = time.delta_secs();

    for (id, kin) in &query {
        if let Some(tracked) = tracker.0.get_mut(id) {
            if delta > 0.0 {
                tracked.vel = (kin.pos - tracked.pos) / delta;
            }
            tracked.pos = kin.pos;
        } else {
            tracker.0.insert(
                id.clone(),
                Tracked {
                    pos: kin.pos,
                    vel: Vec3::ZERO,
                },
            );
        }
    }
}
