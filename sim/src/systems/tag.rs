use bevy_ecs::prelude::*;
use bevy_math::Vec3;
use tracing::{info, warn};

use crate::{
    components::{Kinematics, RosterIndex, TagState},
    config::SimConfig,
    resources::{BotMap, TagLog},
};
use common::{
    constants::{TAG_IMMUNITY, TAG_RADIUS},
    protocol::{PlayerId, TagEvent},
};

/// Leave exactly one IT holder among `tags` (given in roster order): the first flagged entity
/// keeps it, or the first entity gets it when nobody is flagged. Returns the holder count found.
pub fn repair_it_holders<'a>(tags: impl IntoIterator<Item = &'a mut TagState>) -> usize {
    let mut holders = 0;
    let mut first = None;

    for tag in tags {
        if tag.is_it {
            holders += 1;
            if holders > 1 {
                tag.is_it = false;
            }
        }
        if first.is_none() {
            first = Some(tag);
        }
    }

    if holders == 0 {
        if let Some(tag) = first {
            tag.is_it = true;
            tag.immunity = 0.0;
        }
    }

    holders
}

// ============================================================================
// IT Invariant System
// ============================================================================

pub fn it_invariant_system(mut query: Query<(&RosterIndex, &mut TagState)>) {
    let mut entries: Vec<_> = query.iter_mut().collect();
    if entries.is_empty() {
        return;
    }
    entries.sort_by_key(|(index, _)| **index);

    let holders = repair_it_holders(entries.iter_mut().map(|(_, tag)| &mut **tag));
    if holders != 1 {
        warn!(holders, "IT holder count drifted, repaired");
    }
    debug_assert_eq!(holders, 1, "exactly one IT holder expected");
}

// ============================================================================
// Tag System
// ============================================================================

/// Fire at most one tag per frame: the IT holder tags the first entity in roster order that is a
/// valid target and closer than `TAG_RADIUS` in the gameplay plane.
pub fn tag_system(
    config: Res<SimConfig>,
    mut bots: ResMut<BotMap>,
    mut log: ResMut<TagLog>,
    mut query: Query<(Entity, &RosterIndex, &PlayerId, &Kinematics, &mut TagState)>,
) {
    let mut roster: Vec<(RosterIndex, Entity, PlayerId, Vec3, TagState)> = query
        .iter()
        .map(|(entity, index, id, kin, tag)| (*index, entity, id.clone(), kin.pos, *tag))
        .collect();
    roster.sort_by_key(|(index, ..)| *index);

    let Some((_, it_entity, it_id, it_pos, _)) = roster.iter().find(|(.., tag)| tag.is_it) else {
        return;
    };

    let Some((_, tagged_entity, tagged_id, _, _)) = roster
        .iter()
        .find(|(_, _, _, pos, tag)| tag.is_tag_target() && config.mode.plane_distance(*it_pos, *pos) < TAG_RADIUS)
    else {
        return;
    };

    if let Ok((.., mut tag)) = query.get_mut(*it_entity) {
        tag.is_it = false;
        tag.immunity = TAG_IMMUNITY;
    }
    if let Ok((.., mut tag)) = query.get_mut(*tagged_entity) {
        tag.is_it = true;
        tag.immunity = 0.0;
    }

    bots.invalidate(it_id);
    bots.invalidate(tagged_id);

    info!(tagger = %it_id, tagged = %tagged_id, "tag");
    log.0.push(TagEvent {
        tagger: it_id.clone(),
        tagged: tagged_id.clone(),
    });
}
