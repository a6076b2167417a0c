use bevy_ecs::prelude::*;
use bevy_math::{Vec2, Vec3};
use bevy_time::Time;
use rand::Rng;
use tracing::debug;

use super::{
    navigation::{Seek, random_heading, search_heading, wander_circle_goal, wander_swing},
    targeting::{Observed, chase_candidates, lead_point, pick_weighted},
};
use crate::{
    components::{Kinematics, MoveIntent, RosterIndex, TagState},
    config::SimConfig,
    constants::*,
    resources::{BotInfo, BotMap, BotMode, BotRng, MotionTracker, ObstacleField},
};
use common::{
    constants::{BOT_SPEED, IT_SPEED_BONUS},
    protocol::{Control, MapMode, Obstacle, PlayerId},
};

// Shared inputs of one frame's bot decisions
struct Frame<'a> {
    mode: MapMode,
    delta: f32,
    obstacles: &'a [Obstacle],
    tracker: &'a MotionTracker,
}

// ============================================================================
// Bots AI System
// ============================================================================

pub fn bots_ai_system(
    time: Res<Time>,
    config: Res<SimConfig>,
    field: Res<ObstacleField>,
    tracker: Res<MotionTracker>,
    mut bots: ResMut<BotMap>,
    mut rng: ResMut<BotRng>,
    roster_query: Query<(Entity, &RosterIndex, &PlayerId, &Control, &Kinematics, &TagState)>,
    mut intents: Query<&mut MoveIntent>,
) {
    let frame = Frame {
        mode: config.mode,
        delta: time.delta_secs(),
        obstacles: &field.0,
        tracker: &tracker,
    };

    // Snapshot in roster order so decisions (and random draws) are reproducible
    let mut ordered: Vec<(RosterIndex, Observed)> = roster_query
        .iter()
        .map(|(entity, index, id, control, kin, tag)| {
            (
                *index,
                Observed {
                    entity,
                    id: id.clone(),
                    control: *control,
                    pos: kin.pos,
                    grounded: kin.grounded,
                    tag: *tag,
                },
            )
        })
        .collect();
    ordered.sort_by_key(|(index, _)| *index);
    let roster: Vec<Observed> = ordered.into_iter().map(|(_, observed)| observed).collect();
    let it_holder = roster.iter().find(|o| o.tag.is_it);

    for me in roster.iter().filter(|o| o.control == Control::Bot) {
        let info = bots
            .0
            .entry(me.id.clone())
            .or_insert_with(|| BotInfo::new(me.pos, me.tag.is_it, &mut rng.0));

        let intent = drive_bot(info, me, &roster, it_holder, &frame, &mut rng.0);
        if let Ok(mut move_intent) = intents.get_mut(me.entity) {
            *move_intent = intent;
        }
    }
}

#[must_use]
fn bot_speed(tag: &TagState) -> f32 {
    if tag.is_it { BOT_SPEED * (1.0 + IT_SPEED_BONUS) } else { BOT_SPEED }
}

// Horizontal displacement used by stuck detection (jumping in place does not count)
#[must_use]
fn horizontal_displacement(mode: MapMode, a: Vec3, b: Vec3) -> f32 {
    match mode {
        MapMode::Arena => Vec2::new(a.x - b.x, a.z - b.z).length(),
        MapMode::Platformer => (a.x - b.x).abs(),
    }
}

fn drive_bot<R: Rng>(
    info: &mut BotInfo,
    me: &Observed,
    roster: &[Observed],
    it_holder: Option<&Observed>,
    frame: &Frame,
    rng: &mut R,
) -> MoveIntent {
    // A role change makes any lock stale
    if info.was_it != me.tag.is_it {
        info.was_it = me.tag.is_it;
        info.clear_target();
    }

    // Displacement since the last decision, covered during that frame's delta
    let moved = horizontal_displacement(frame.mode, me.pos, info.last_pos);
    let elapsed = std::mem::replace(&mut info.last_delta, frame.delta);
    info.last_pos = me.pos;

    let jump = frame.mode.is_platformer() && roll_jump(info, me.grounded, frame.delta, rng);

    if info.escape_timer > 0.0 {
        info.escape_timer -= frame.delta;
        return MoveIntent {
            dir: info.escape_dir,
            jump,
        };
    }

    if elapsed > 0.0 {
        if moved < BOT_STUCK_SPEED * elapsed {
            info.stuck_timer += elapsed;
        } else {
            info.stuck_timer = 0.0;
        }
    }

    if info.stuck_timer > BOT_STUCK_TIME {
        info.stuck_timer = 0.0;
        info.escape_timer = rng.random_range(BOT_ESCAPE_DURATION.0..BOT_ESCAPE_DURATION.1);
        info.escape_dir = random_heading(frame.mode, rng);
        info.mode = BotMode::Escape;
        info.clear_target();
        debug!(bot = %me.id, "stuck, starting escape maneuver");
        return MoveIntent {
            dir: info.escape_dir,
            jump,
        };
    }

    let dir = if me.tag.is_it {
        chase(info, me, roster, frame, rng)
    } else {
        flee(info, me, it_holder, frame, rng)
    };

    MoveIntent { dir, jump }
}

// Count down to the next jump; only fires while standing on something
fn roll_jump<R: Rng>(info: &mut BotInfo, grounded: bool, delta: f32, rng: &mut R) -> bool {
    info.jump_timer -= delta;
    if info.jump_timer <= 0.0 && grounded {
        info.jump_timer = rng.random_range(BOT_JUMP_INTERVAL.0..BOT_JUMP_INTERVAL.1);
        true
    } else {
        false
    }
}

// ============================================================================
// Behaviors
// ============================================================================

fn chase<R: Rng>(info: &mut BotInfo, me: &Observed, roster: &[Observed], frame: &Frame, rng: &mut R) -> Vec2 {
    let candidates = chase_candidates(&me.id, roster);
    if candidates.is_empty() {
        info.clear_target();
        return wander(info, me, frame);
    }
    info.mode = BotMode::Chase;

    let locked = if info.lock_timer > 0.0 {
        info.target
            .as_ref()
            .and_then(|id| candidates.iter().position(|c| c.id == *id))
    } else {
        None
    };

    let target = if let Some(index) = locked {
        info.lock_timer -= frame.delta;
        candidates[index]
    } else {
        let index = pick_weighted(rng, frame.mode, me.pos, &candidates, info.target.as_ref());
        let picked = candidates[index];
        info.target = Some(picked.id.clone());
        info.lock_timer = rng.random_range(BOT_LOCK_DURATION.0..BOT_LOCK_DURATION.1);
        debug!(bot = %me.id, target = %picked.id, lock = info.lock_timer, "chase target selected");
        picked
    };

    let goal = lead_point(frame.mode, target, frame.tracker);
    steer_toward(me, goal, frame, rng)
}

fn flee<R: Rng>(info: &mut BotInfo, me: &Observed, it_holder: Option<&Observed>, frame: &Frame, rng: &mut R) -> Vec2 {
    let Some(it) = it_holder.filter(|it| it.id != me.id) else {
        info.target = None;
        return wander(info, me, frame);
    };
    info.mode = BotMode::Flee;
    if info.target.as_ref() != Some(&it.id) {
        info.target = Some(it.id.clone());
    }

    match frame.mode {
        MapMode::Platformer => Vec2::new(if me.pos.x >= it.pos.x { 1.0 } else { -1.0 }, 0.0),
        MapMode::Arena => {
            let threat = frame.mode.plane(it.pos);
            let away = (frame.mode.plane(me.pos) - threat).normalize_or_zero();
            let away = if away == Vec2::ZERO { random_heading(frame.mode, rng) } else { away };
            let noise = away.perp() * rng.random_range(-BOT_FLEE_NOISE..BOT_FLEE_NOISE);
            let desired = (away + noise).normalize_or_zero();
            search_heading(me.pos, desired, threat, Seek::Away, probe_step(me, frame), frame.obstacles, rng)
        }
    }
}

fn wander(info: &mut BotInfo, me: &Observed, frame: &Frame) -> Vec2 {
    info.mode = BotMode::Wander;
    match frame.mode {
        MapMode::Arena => {
            let goal = wander_circle_goal(&mut info.wander_phase, bot_speed(&me.tag), frame.delta);
            (goal - frame.mode.plane(me.pos)).normalize_or_zero()
        }
        MapMode::Platformer => {
            info.wander_right = wander_swing(me.pos.x, info.wander_right);
            Vec2::new(if info.wander_right { 1.0 } else { -1.0 }, 0.0)
        }
    }
}

fn probe_step(me: &Observed, frame: &Frame) -> f32 {
    (bot_speed(&me.tag) * frame.delta).max(BOT_PROBE_MIN_STEP)
}

// Heading toward a plane-space goal, routed around obstacles in the arena
fn steer_toward<R: Rng>(me: &Observed, goal: Vec2, frame: &Frame, rng: &mut R) -> Vec2 {
    match frame.mode {
        MapMode::Platformer => {
            let dx = goal.x - me.pos.x;
            if dx.abs() < f32::EPSILON { Vec2::ZERO } else { Vec2::new(dx.signum(), 0.0) }
        }
        MapMode::Arena => {
            let desired = (goal - frame.mode.plane(me.pos)).normalize_or_zero();
            if desired == Vec2::ZERO {
                return Vec2::ZERO;
            }
            search_heading(me.pos, desired, goal, Seek::Toward, probe_step(me, frame), frame.obstacles, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn observed(id: &str, x: f32, z: f32, is_it: bool) -> Observed {
        Observed {
            entity: Entity::PLACEHOLDER,
            id: PlayerId::new(id),
            control: Control::Bot,
            pos: Vec3::new(x, 0.5, z),
            grounded: true,
            tag: TagState { is_it, immunity: 0.0 },
        }
    }

    fn frame(tracker: &MotionTracker) -> Frame<'_> {
        Frame {
            mode: MapMode::Arena,
            delta: 1.0 / 60.0,
            obstacles: &[],
            tracker,
        }
    }

    #[test]
    fn chaser_locks_a_target_and_heads_for_it() {
        let tracker = MotionTracker::default();
        let frame = frame(&tracker);
        let mut rng = StdRng::seed_from_u64(2);
        let roster = vec![observed("bot-0", 0.0, 0.0, true), observed("bot-1", 8.0, 0.0, false)];
        let mut info = BotInfo::new(roster[0].pos, true, &mut rng);

        let intent = drive_bot(&mut info, &roster[0], &roster, Some(&roster[0]), &frame, &mut rng);
        assert_eq!(info.mode, BotMode::Chase);
        assert_eq!(info.target, Some(PlayerId::new("bot-1")));
        assert!(info.lock_timer >= BOT_LOCK_DURATION.0);
        assert!(intent.dir.x > 0.9, "{:?}", intent.dir);
    }

    #[test]
    fn chaser_wanders_when_everyone_is_immune() {
        let tracker = MotionTracker::default();
        let frame = frame(&tracker);
        let mut rng = StdRng::seed_from_u64(2);
        let mut other = observed("bot-1", 8.0, 0.0, false);
        other.tag.immunity = 2.0;
        let roster = vec![observed("bot-0", 0.0, 0.0, true), other];
        let mut info = BotInfo::new(roster[0].pos, true, &mut rng);

        let intent = drive_bot(&mut info, &roster[0], &roster, Some(&roster[0]), &frame, &mut rng);
        assert_eq!(info.mode, BotMode::Wander);
        assert!(info.target.is_none());
        assert!((intent.dir.length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn evader_runs_away_from_it() {
        let tracker = MotionTracker::default();
        let frame = frame(&tracker);
        let mut rng = StdRng::seed_from_u64(4);
        let roster = vec![observed("bot-0", 0.0, 0.0, true), observed("bot-1", 5.0, 0.0, false)];
        let mut info = BotInfo::new(roster[1].pos, false, &mut rng);

        let intent = drive_bot(&mut info, &roster[1], &roster, Some(&roster[0]), &frame, &mut rng);
        assert_eq!(info.mode, BotMode::Flee);
        assert_eq!(info.target, Some(PlayerId::new("bot-0")));
        assert!(intent.dir.x > 0.5, "{:?}", intent.dir);
    }

    #[test]
    fn losing_it_clears_chase_lock() {
        let tracker = MotionTracker::default();
        let frame = frame(&tracker);
        let mut rng = StdRng::seed_from_u64(6);
        let roster = vec![observed("bot-0", 0.0, 0.0, false), observed("bot-1", 5.0, 0.0, true)];
        let mut info = BotInfo::new(roster[0].pos, true, &mut rng);
        info.target = Some(PlayerId::new("bot-2"));
        info.lock_timer = 4.0;

        drive_bot(&mut info, &roster[0], &roster, Some(&roster[1]), &frame, &mut rng);
        assert!(!info.was_it);
        assert_eq!(info.target, Some(PlayerId::new("bot-1")));
        assert!(info.lock_timer.abs() < f32::EPSILON);
    }

    #[test]
    fn stuck_bot_escapes_and_drops_target() {
        let tracker = MotionTracker::default();
        let frame = frame(&tracker);
        let mut rng = StdRng::seed_from_u64(8);
        let roster = vec![observed("bot-0", 0.0, 0.0, true), observed("bot-1", 8.0, 0.0, false)];
        let mut info = BotInfo::new(roster[0].pos, true, &mut rng);

        // Same position every frame
        let mut escaped = false;
        for _ in 0..60 {
            drive_bot(&mut info, &roster[0], &roster, Some(&roster[0]), &frame, &mut rng);
            if info.mode == BotMode::Escape {
                escaped = true;
                break;
            }
        }
        assert!(escaped);
        assert!(info.target.is_none());
        assert!(info.escape_timer >= BOT_ESCAPE_DURATION.0);
        assert!((info.escape_dir.length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn stuck_check_uses_delta_of_the_measured_frame() {
        let tracker = MotionTracker::default();
        let frame = Frame {
            mode: MapMode::Arena,
            delta: 0.5,
            obstacles: &[],
            tracker: &tracker,
        };
        let mut rng = StdRng::seed_from_u64(10);
        let roster = vec![observed("bot-0", 0.1, 0.0, true), observed("bot-1", 8.0, 0.0, false)];
        let mut info = BotInfo::new(Vec3::new(0.0, 0.5, 0.0), true, &mut rng);
        info.last_delta = 0.1;
        info.stuck_timer = 0.3;

        // 0.1 units over a 0.1 s frame is 1 u/s, above the stuck threshold
        drive_bot(&mut info, &roster[0], &roster, Some(&roster[0]), &frame, &mut rng);
        assert!(info.stuck_timer.abs() < f32::EPSILON);
        assert!((info.last_delta - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn slow_crawl_accumulates_measured_frame_time() {
        let tracker = MotionTracker::default();
        let frame = Frame {
            mode: MapMode::Arena,
            delta: 0.01,
            obstacles: &[],
            tracker: &tracker,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let roster = vec![observed("bot-0", 0.02, 0.0, true), observed("bot-1", 8.0, 0.0, false)];
        let mut info = BotInfo::new(Vec3::new(0.0, 0.5, 0.0), true, &mut rng);
        info.last_delta = 0.1;

        // 0.02 units over 0.1 s is 0.2 u/s, which counts as stuck
        drive_bot(&mut info, &roster[0], &roster, Some(&roster[0]), &frame, &mut rng);
        assert!((info.stuck_timer - 0.1).abs() < 1e-6);
    }

    #[test]
    fn platformer_bot_jumps_when_timer_expires() {
        let tracker = MotionTracker::default();
        let frame = Frame {
            mode: MapMode::Platformer,
            delta: 0.5,
            obstacles: &[],
            tracker: &tracker,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let roster = vec![observed("bot-0", 0.0, 0.0, true), observed("bot-1", -6.0, 0.0, false)];
        let mut info = BotInfo::new(roster[0].pos, true, &mut rng);

        let jumps = (0..5)
            .filter(|_| drive_bot(&mut info, &roster[0], &roster, Some(&roster[0]), &frame, &mut rng).jump)
            .count();
        assert!(jumps >= 1);
    }
}
