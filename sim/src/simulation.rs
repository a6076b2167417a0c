use bevy_ecs::{prelude::*, schedule::ExecutorKind};
use bevy_time::Time;
use std::{collections::HashSet, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    components::{Kinematics, MoveIntent, Profile, RosterIndex, TagState},
    config::SimConfig,
    resources::{BotMap, BotRng, LocalIntent, MotionTracker, ObstacleField, RoundClock, TagLog},
    systems::*,
};
use common::{
    constants::MAX_FRAME_DELTA,
    protocol::{Control, ControlIntent, Obstacle, Player, PlayerId, RoundOutcome, TagEvent},
};

// Clamp a frame delta into [0, MAX_FRAME_DELTA]; garbage becomes 0
#[must_use]
pub fn sanitize_delta(delta: f32) -> f32 {
    if !delta.is_finite() || delta <= 0.0 {
        0.0
    } else {
        delta.min(MAX_FRAME_DELTA)
    }
}

// Whether `sanitize_delta` had to change the value
#[must_use]
pub fn delta_is_adjusted(delta: f32) -> bool {
    !delta.is_finite() || sanitize_delta(delta).to_bits() != delta.to_bits()
}

/// Frame driver facing the front end.
///
/// Owns the ECS world for one match: roster entities, the obstacle field, bot bookkeeping and the
/// round clock. Each `step` runs the frame systems once, in a fixed order, on a single thread.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    snapshot: Vec<Player>,
    next_index: u32,
}

impl Simulation {
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(config);
        world.insert_resource(Time::<()>::default());
        world.insert_resource(ObstacleField::default());
        world.insert_resource(LocalIntent::default());
        world.insert_resource(TagLog::default());
        world.insert_resource(BotMap::default());
        world.insert_resource(MotionTracker::default());
        world.insert_resource(BotRng::seeded(config.ai_seed));
        world.insert_resource(RoundClock {
            remaining: config.round_seconds,
            active: false,
        });

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                round_clock_system,
                tag_immunity_system,
                it_invariant_system,
                local_intent_system,
                bots_ai_system,
                players_movement_system,
                tag_system,
                motion_tracking_system,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            snapshot: Vec::new(),
            next_index: 0,
        }
    }

    // ========================================================================
    // Round Lifecycle
    // ========================================================================

    /// Start a round with a fresh roster and obstacle field. Any previous round state, including
    /// bot bookkeeping, is discarded.
    pub fn on_round_start(&mut self, players: Vec<Player>, obstacles: Vec<Obstacle>) {
        let existing: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<PlayerId>>()
            .iter(&self.world)
            .collect();
        for entity in existing {
            self.world.despawn(entity);
        }

        self.world.resource_mut::<BotMap>().0.clear();
        self.world.resource_mut::<MotionTracker>().0.clear();
        self.world.resource_mut::<TagLog>().0.clear();
        self.world.resource_mut::<ObstacleField>().0 = obstacles;

        let round_seconds = self.world.resource::<SimConfig>().round_seconds;
        *self.world.resource_mut::<RoundClock>() = RoundClock {
            remaining: round_seconds,
            active: true,
        };

        self.next_index = 0;
        let mut seen = HashSet::new();
        for player in players {
            if seen.insert(player.id.clone()) {
                self.spawn(player);
            } else {
                warn!(id = %player.id, "duplicate id in roster, skipped");
            }
        }
        self.normalize_it();
        self.refresh_snapshot();

        info!(
            players = self.snapshot.len(),
            obstacles = self.world.resource::<ObstacleField>().0.len(),
            seconds = round_seconds,
            "round started"
        );
    }

    /// Advance one frame. Returns the updated roster in roster order. Once the round has ended
    /// this is a no-op that returns the final roster.
    pub fn step(&mut self, delta: f32, intent: &ControlIntent) -> &[Player] {
        if !self.is_active() {
            return &self.snapshot;
        }

        let dt = sanitize_delta(delta);
        if delta_is_adjusted(delta) {
            warn!(delta, clamped = dt, "frame delta clamped");
        }

        self.world.resource_mut::<TagLog>().0.clear();
        self.world.resource_mut::<LocalIntent>().0 = intent.clone();
        self.world.resource_mut::<Time>().advance_by(Duration::from_secs_f32(dt));

        self.schedule.run(&mut self.world);

        self.refresh_snapshot();
        &self.snapshot
    }

    /// End the round and compute the winners (everyone not holding IT). Only the first call after
    /// a round start returns an outcome.
    pub fn on_round_end(&mut self) -> Option<RoundOutcome> {
        let mut clock = self.world.resource_mut::<RoundClock>();
        if !clock.active {
            return None;
        }
        clock.active = false;

        let winners: Vec<PlayerId> = self.snapshot.iter().filter(|p| !p.is_it).map(|p| p.id.clone()).collect();
        let it_holder = self.snapshot.iter().find(|p| p.is_it).map(|p| p.id.to_string());
        info!(winners = winners.len(), it = ?it_holder, "round ended");

        Some(RoundOutcome {
            winners,
            final_players: self.snapshot.clone(),
        })
    }

    // ========================================================================
    // Roster Changes
    // ========================================================================

    /// Remove an entity (e.g. kicked) together with all bookkeeping keyed by its id. Returns
    /// whether it was present.
    pub fn remove_entity(&mut self, id: &PlayerId) -> bool {
        let Some(entity) = self.find_entity(id) else {
            return false;
        };

        self.world.despawn(entity);
        self.purge(id);
        if self.is_active() {
            self.normalize_it();
        }
        self.refresh_snapshot();

        info!(%id, "entity removed");
        true
    }

    /// Merge a roster pushed by the room between frames: unknown ids are spawned, ids missing from
    /// `incoming` are removed, remote humans take the incoming physical state, and local and bot
    /// entities keep their simulated state.
    pub fn sync_roster(&mut self, incoming: Vec<Player>) {
        let keep: HashSet<PlayerId> = incoming.iter().map(|p| p.id.clone()).collect();

        let stale: Vec<(Entity, PlayerId)> = self
            .world
            .query::<(Entity, &PlayerId)>()
            .iter(&self.world)
            .filter(|(_, id)| !keep.contains(*id))
            .map(|(entity, id)| (entity, id.clone()))
            .collect();
        for (entity, id) in stale {
            self.world.despawn(entity);
            self.purge(&id);
            debug!(%id, "dropped by roster sync");
        }

        for player in incoming {
            match self.find_entity(&player.id) {
                Some(entity) => self.merge(entity, player),
                None => {
                    debug!(id = %player.id, "joined by roster sync");
                    self.spawn(player);
                }
            }
        }

        if self.is_active() {
            self.normalize_it();
        }
        self.refresh_snapshot();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.snapshot
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.world.resource::<ObstacleField>().0
    }

    // Tags fired during the most recent step
    #[must_use]
    pub fn last_tags(&self) -> &[TagEvent] {
        &self.world.resource::<TagLog>().0
    }

    #[must_use]
    pub fn time_remaining(&self) -> f32 {
        self.world.resource::<RoundClock>().remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.world.resource::<RoundClock>().is_expired()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.world.resource::<RoundClock>().active
    }

    #[must_use]
    pub fn has_bot_state(&self, id: &PlayerId) -> bool {
        self.world.resource::<BotMap>().0.contains_key(id)
    }

    #[must_use]
    pub fn is_tracked(&self, id: &PlayerId) -> bool {
        self.world.resource::<MotionTracker>().0.contains_key(id)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn spawn(&mut self, player: Player) {
        let index = RosterIndex(self.next_index);
        self.next_index += 1;
        let mode = self.world.resource::<SimConfig>().mode;

        self.world.spawn((
            player.id,
            player.control,
            index,
            Profile {
                name: player.name,
                color: player.color,
            },
            Kinematics {
                pos: confine(mode, player.pos),
                vel_y: player.vel_y,
                grounded: player.grounded,
                yaw: player.yaw,
            },
            TagState {
                is_it: player.is_it,
                immunity: player.immunity.max(0.0),
            },
            MoveIntent::default(),
        ));
    }

    fn merge(&mut self, entity: Entity, player: Player) {
        let mode = self.world.resource::<SimConfig>().mode;
        let Ok(mut entry) = self.world.get_entity_mut(entity) else {
            return;
        };

        if let Some(mut profile) = entry.get_mut::<Profile>() {
            profile.name = player.name;
            profile.color = player.color;
        }

        if entry.get::<Control>() != Some(&Control::Remote) {
            return;
        }
        if let Some(mut kin) = entry.get_mut::<Kinematics>() {
            kin.pos = confine(mode, player.pos);
            kin.vel_y = player.vel_y;
            kin.grounded = player.grounded;
            kin.yaw = player.yaw;
        }
    }

    fn find_entity(&mut self, id: &PlayerId) -> Option<Entity> {
        self.world
            .query::<(Entity, &PlayerId)>()
            .iter(&self.world)
            .find(|(_, other)| *other == id)
            .map(|(entity, _)| entity)
    }

    // Drop every per-id record so nothing dangles after a removal
    fn purge(&mut self, id: &PlayerId) {
        self.world.resource_mut::<BotMap>().0.remove(id);
        self.world.resource_mut::<MotionTracker>().0.remove(id);
        self.world.resource_mut::<BotMap>().invalidate(id);
    }

    fn normalize_it(&mut self) {
        let mut query = self.world.query::<(&RosterIndex, &mut TagState)>();
        let mut entries: Vec<_> = query.iter_mut(&mut self.world).collect();
        entries.sort_by_key(|(index, _)| **index);
        let holders = repair_it_holders(entries.iter_mut().map(|(_, tag)| &mut **tag));
        if holders != 1 && !entries.is_empty() {
            debug!(holders, "normalized IT holder");
        }
    }

    fn refresh_snapshot(&mut self) {
        let mut query = self
            .world
            .query::<(&RosterIndex, &PlayerId, &Control, &Profile, &Kinematics, &TagState)>();
        let mut rows: Vec<_> = query.iter(&self.world).collect();
        rows.sort_by_key(|(index, ..)| **index);

        self.snapshot = rows
            .into_iter()
            .map(|(_, id, control, profile, kin, tag)| Player {
                id: id.clone(),
                name: profile.name.clone(),
                color: profile.color.clone(),
                pos: kin.pos,
                vel_y: kin.vel_y,
                grounded: kin.grounded,
                is_it: tag.is_it,
                control: *control,
                immunity: tag.immunity,
                yaw: kin.yaw,
            })
            .collect();
    }
}
