use bevy_math::Vec3;
use rand::Rng;
use tracing::warn;

use crate::constants::{BOT_NAMES, PLATFORMER_SPAWN_Y, PLAYER_COLORS, SPAWN_JITTER};
use common::{
    constants::{ARENA_FLOOR_Y, MAX_ENTITIES},
    protocol::{Control, MapMode, Player, PlayerId},
};

// A human participant as known by the room
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
}

impl Seat {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
        }
    }
}

fn spawn_y(mode: MapMode) -> f32 {
    match mode {
        MapMode::Arena => ARENA_FLOOR_Y,
        MapMode::Platformer => PLATFORMER_SPAWN_Y,
    }
}

/// Build the starting roster: the local human (at the origin), remote humans, then bots up to
/// `MAX_ENTITIES`. The first bot starts as IT, or the first entity when there are no bots.
pub fn build_roster<R: Rng>(local: Option<Seat>, remotes: Vec<Seat>, mode: MapMode, rng: &mut R) -> Vec<Player> {
    let y = spawn_y(mode);
    let mut roster = Vec::with_capacity(MAX_ENTITIES);

    if let Some(seat) = local {
        roster.push((seat, Control::Local, Vec3::new(0.0, y, 0.0)));
    }
    for seat in remotes {
        let x = rng.random_range(-SPAWN_JITTER..SPAWN_JITTER);
        roster.push((seat, Control::Remote, Vec3::new(x, y, 0.0)));
    }
    if roster.len() > MAX_ENTITIES {
        warn!(humans = roster.len(), max = MAX_ENTITIES, "too many humans, dropping extras");
        roster.truncate(MAX_ENTITIES);
    }

    let bots = MAX_ENTITIES - roster.len();
    for (n, name) in BOT_NAMES.iter().take(bots).enumerate() {
        let x = rng.random_range(-SPAWN_JITTER..SPAWN_JITTER);
        let seat = Seat::new(format!("bot-{n}"), format!("Bot {name}"));
        roster.push((seat, Control::Bot, Vec3::new(x, y, 0.0)));
    }

    let mut players: Vec<Player> = roster
        .into_iter()
        .enumerate()
        .map(|(i, (seat, control, pos))| {
            let mut player = Player::new(seat.id, seat.name, PLAYER_COLORS[i % PLAYER_COLORS.len()], control, pos);
            player.grounded = mode == MapMode::Arena;
            player
        })
        .collect();

    let it_index = players.iter().position(Player::is_bot).unwrap_or(0);
    if let Some(player) = players.get_mut(it_index) {
        player.is_it = true;
    }

    players
}
