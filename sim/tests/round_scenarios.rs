use bevy_math::Vec3;
use rand::{SeedableRng, rngs::StdRng};
use rstest::rstest;

use common::{
    collision::footprints_overlap,
    constants::*,
    protocol::{Control, ControlIntent, MapMode, Obstacle, Player, PlayerId},
    rng::SeededRng,
};
use sim::{
    Seat, SimConfig, Simulation, build_roster, generate_layout,
    map::{column_tops, in_clear_zone},
};

const DT: f32 = 1.0 / 60.0;

// ============================================================================
// Helpers
// ============================================================================

fn remote(id: &str, x: f32, is_it: bool) -> Player {
    let mut player = Player::new(PlayerId::new(id), id, "#ff4d6d", Control::Remote, Vec3::new(x, ARENA_FLOOR_Y, 0.0));
    player.grounded = true;
    player.is_it = is_it;
    player
}

fn started(mode: MapMode, seed: i64) -> Simulation {
    let layout = generate_layout(seed, mode);
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let players = build_roster(Some(Seat::new("me", "Me")), Vec::new(), mode, &mut rng);

    let mut sim = Simulation::new(SimConfig::new(mode, seed as u64));
    sim.on_round_start(players, layout.obstacles);
    sim
}

fn it_count(players: &[Player]) -> usize {
    players.iter().filter(|p| p.is_it).count()
}

fn is_boundary(obstacle: &Obstacle) -> bool {
    obstacle.id.starts_with("bound-")
}

// "lwall-3-a" and "lwall-3-b" belong to the same L
fn same_lwall(a: &Obstacle, b: &Obstacle) -> bool {
    a.id.starts_with("lwall-") && a.id.rsplit_once('-').map(|(stem, _)| stem) == b.id.rsplit_once('-').map(|(stem, _)| stem)
}

// ============================================================================
// Tagging
// ============================================================================

#[test]
fn tag_moves_it_and_grants_immunity() {
    let mut sim = Simulation::new(SimConfig::new(MapMode::Arena, 1));
    sim.on_round_start(vec![remote("a", 0.0, true), remote("b", 1.0, false)], Vec::new());

    let players = sim.step(DT, &ControlIntent::default()).to_vec();
    assert!(!players[0].is_it);
    assert!(players[1].is_it);
    assert!((players[0].immunity - TAG_IMMUNITY).abs() < f32::EPSILON);
    assert!(players[1].immunity.abs() < f32::EPSILON);

    let tags = sim.last_tags();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].tagger, PlayerId::new("a"));
    assert_eq!(tags[0].tagged, PlayerId::new("b"));

    // The fresh tagger is immune, so nothing fires back
    sim.step(DT, &ControlIntent::default());
    assert!(sim.last_tags().is_empty());
    assert!(sim.players()[1].is_it);
}

#[test]
fn out_of_range_entities_are_not_tagged() {
    let mut sim = Simulation::new(SimConfig::new(MapMode::Arena, 1));
    sim.on_round_start(vec![remote("a", 0.0, true), remote("b", TAG_RADIUS + 0.1, false)], Vec::new());

    for _ in 0..10 {
        sim.step(DT, &ControlIntent::default());
        assert!(sim.last_tags().is_empty());
    }
    assert!(sim.players()[0].is_it);
}

#[test]
fn round_start_repairs_it_holders() {
    let mut sim = Simulation::new(SimConfig::default());
    sim.on_round_start(vec![remote("a", -10.0, false), remote("b", 10.0, false)], Vec::new());
    assert!(sim.players()[0].is_it);

    sim.on_round_start(vec![remote("a", -10.0, true), remote("b", 10.0, true)], Vec::new());
    assert_eq!(it_count(sim.players()), 1);
    assert!(sim.players()[0].is_it);
}

// ============================================================================
// Round Lifecycle
// ============================================================================

#[test]
fn winners_are_everyone_but_it() {
    let mut sim = Simulation::new(SimConfig::new(MapMode::Arena, 5).with_round_seconds(1.0));
    sim.on_round_start(
        vec![
            remote("me", -15.0, false),
            remote("bot-0", -5.0, false),
            remote("bot-1", 5.0, true),
            remote("bot-2", 15.0, false),
        ],
        Vec::new(),
    );

    for _ in 0..100 {
        if sim.is_expired() {
            break;
        }
        sim.step(0.1, &ControlIntent::default());
    }
    assert!(sim.is_expired());
    assert!(sim.time_remaining().abs() < f32::EPSILON);

    let outcome = sim.on_round_end().expect("first round end yields an outcome");
    let winners: Vec<_> = outcome.winners.iter().map(PlayerId::as_str).collect();
    assert_eq!(winners, ["me", "bot-0", "bot-2"]);
    assert_eq!(outcome.final_players.len(), 4);

    assert!(sim.on_round_end().is_none());
}

#[test]
fn step_after_round_end_changes_nothing() {
    let mut sim = started(MapMode::Arena, 42);
    for _ in 0..30 {
        sim.step(DT, &ControlIntent::default());
    }
    sim.on_round_end();

    let frozen = sim.players().to_vec();
    let remaining = sim.time_remaining();
    let after = sim.step(DT, &ControlIntent::default()).to_vec();
    assert_eq!(frozen, after);
    assert!((sim.time_remaining() - remaining).abs() < f32::EPSILON);
}

#[test]
fn large_deltas_are_clamped() {
    let mut sim = Simulation::new(SimConfig::default());
    sim.on_round_start(vec![remote("a", 0.0, true)], Vec::new());

    sim.step(5.0, &ControlIntent::default());
    let expected = DEFAULT_ROUND_SECONDS - MAX_FRAME_DELTA;
    assert!((sim.time_remaining() - expected).abs() < 1e-4);

    sim.step(-1.0, &ControlIntent::default());
    sim.step(f32::NAN, &ControlIntent::default());
    assert!((sim.time_remaining() - expected).abs() < 1e-4);
}

#[test]
fn local_player_follows_intent() {
    let mut sim = Simulation::new(SimConfig::default());
    let mut me = Player::new(PlayerId::new("me"), "Me", "#ff4d6d", Control::Local, Vec3::new(0.0, ARENA_FLOOR_Y, 0.0));
    me.grounded = true;
    sim.on_round_start(vec![me], Vec::new());

    let forward = ControlIntent {
        forward: 1.0,
        ..ControlIntent::default()
    };
    for _ in 0..10 {
        sim.step(0.1, &forward);
    }
    let me = &sim.players()[0];
    assert!((me.pos.z + PLAYER_SPEED * (1.0 + IT_SPEED_BONUS)).abs() < 1e-3, "{:?}", me.pos);
    assert!(me.pos.x.abs() < 1e-4);
}

// ============================================================================
// Platformer Physics
// ============================================================================

#[test]
fn falling_local_player_lands_on_ledge() {
    let ledge = Obstacle {
        id: "platform-0".into(),
        pos: Vec3::new(0.0, 1.8, 0.0),
        size: Vec3::new(4.0, 0.4, 2.0),
        color: "#00ffcc".into(),
        rotation: None,
    };
    let mut me = Player::new(PlayerId::new("me"), "Me", "#ff4d6d", Control::Local, Vec3::new(0.5, 2.55, 0.0));
    me.vel_y = -5.0;

    let mut sim = Simulation::new(SimConfig::new(MapMode::Platformer, 3));
    sim.on_round_start(vec![me], vec![ledge]);

    let me = sim.step(DT, &ControlIntent::default())[0].clone();
    assert!(me.grounded);
    assert!((me.pos.y - 2.5).abs() < 1e-5, "{:?}", me.pos);
    assert!(me.vel_y.abs() < f32::EPSILON);
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(99)]
#[case(-12)]
fn ledge_gaps_are_jumpable(#[case] seed: i64) {
    let mut rng = SeededRng::new(seed);
    for _ in 0..20 {
        let tops = column_tops(&mut rng);
        assert!(tops[0] <= MAX_LEDGE_GAP);
        for pair in tops.windows(2) {
            assert!(pair[1] - pair[0] <= MAX_LEDGE_GAP + PHYSICS_EPSILON, "{tops:?}");
        }
    }
}

// ============================================================================
// Whole-Round Invariants
// ============================================================================

#[rstest]
#[case(MapMode::Arena, 7)]
#[case(MapMode::Arena, 12345)]
#[case(MapMode::Platformer, 9)]
#[case(MapMode::Platformer, 300)]
fn round_keeps_invariants(#[case] mode: MapMode, #[case] seed: i64) {
    let mut sim = started(mode, seed);
    let mut previous = sim.players().to_vec();

    for _ in 0..900 {
        let players = sim.step(DT, &ControlIntent::default()).to_vec();
        assert_eq!(it_count(&players), 1);

        let taggers: Vec<PlayerId> = sim.last_tags().iter().map(|t| t.tagger.clone()).collect();
        assert!(taggers.len() <= 1);

        for (before, now) in previous.iter().zip(&players) {
            assert_eq!(before.id, now.id);
            assert!(now.pos.x.abs() <= MAP_BOUND + PHYSICS_EPSILON, "{} left the field", now.id);
            assert!((0.0..=TAG_IMMUNITY).contains(&now.immunity));
            if now.immunity > before.immunity {
                assert!(taggers.contains(&now.id));
                assert!((now.immunity - TAG_IMMUNITY).abs() < f32::EPSILON);
            }

            match mode {
                MapMode::Arena => {
                    assert!(now.pos.z.abs() <= MAP_BOUND + PHYSICS_EPSILON);
                    assert!((now.pos.y - ARENA_FLOOR_Y).abs() < f32::EPSILON);
                }
                MapMode::Platformer => {
                    assert!(now.pos.z.abs() < f32::EPSILON);
                    assert!(now.pos.y >= PLAYER_HALF_HEIGHT - PHYSICS_EPSILON);
                }
            }
        }
        previous = players;
    }
}

#[test]
fn removal_purges_bot_bookkeeping() {
    let mut sim = started(MapMode::Arena, 21);
    for _ in 0..10 {
        sim.step(DT, &ControlIntent::default());
    }

    let gone = PlayerId::new("bot-1");
    assert!(sim.has_bot_state(&gone));
    assert!(sim.is_tracked(&gone));

    assert!(sim.remove_entity(&gone));
    assert!(!sim.has_bot_state(&gone));
    assert!(!sim.is_tracked(&gone));
    assert!(sim.players().iter().all(|p| p.id != gone));
    assert!(!sim.remove_entity(&gone));

    for _ in 0..60 {
        sim.step(DT, &ControlIntent::default());
        assert_eq!(it_count(sim.players()), 1);
    }
}

#[test]
fn removing_it_holder_hands_it_on() {
    let mut sim = started(MapMode::Arena, 8);
    let holder = sim.players().iter().find(|p| p.is_it).map(|p| p.id.clone()).expect("one IT holder");

    assert!(sim.remove_entity(&holder));
    assert_eq!(sim.players().len(), MAX_ENTITIES - 1);
    assert_eq!(it_count(sim.players()), 1);
}

#[test]
fn roster_sync_merges_remote_state() {
    let mut sim = Simulation::new(SimConfig::default());
    sim.on_round_start(vec![remote("a", -10.0, true), remote("b", 10.0, false)], Vec::new());

    let mut moved = remote("b", 12.0, false);
    moved.name = "Bee".into();
    sim.sync_roster(vec![moved, remote("c", -12.0, false)]);

    let players = sim.players();
    let ids: Vec<_> = players.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["b", "c"]);
    assert!((players[0].pos.x - 12.0).abs() < f32::EPSILON);
    assert_eq!(players[0].name, "Bee");
    assert_eq!(it_count(players), 1);
}

#[test]
fn ingested_positions_are_clamped_to_field() {
    let mut sim = Simulation::new(SimConfig::new(MapMode::Arena, 4));
    let mut far = remote("b", 50.0, false);
    far.pos.z = -60.0;
    sim.on_round_start(vec![remote("a", 0.0, true), far], Vec::new());

    let b = &sim.players()[1];
    assert!((b.pos.x - MAP_BOUND).abs() < f32::EPSILON);
    assert!((b.pos.z + MAP_BOUND).abs() < f32::EPSILON);

    sim.sync_roster(vec![remote("a", 0.0, true), remote("b", -80.0, false)]);
    sim.step(DT, &ControlIntent::default());
    for player in sim.players() {
        assert!(player.pos.x.abs() <= MAP_BOUND, "{} at {:?}", player.id, player.pos);
        assert!(player.pos.z.abs() <= MAP_BOUND, "{} at {:?}", player.id, player.pos);
    }
    assert!((sim.players()[1].pos.x + MAP_BOUND).abs() < f32::EPSILON);
}

#[test]
fn ingested_platformer_positions_stay_in_plane() {
    let mut sim = Simulation::new(SimConfig::new(MapMode::Platformer, 4));
    let mut drifted = remote("b", 30.0, false);
    drifted.pos.z = 5.0;
    sim.on_round_start(vec![remote("a", 0.0, true), drifted.clone()], Vec::new());

    let b = &sim.players()[1];
    assert!((b.pos.x - MAP_BOUND).abs() < f32::EPSILON);
    assert!(b.pos.z.abs() < f32::EPSILON);

    drifted.pos = Vec3::new(-40.0, 3.0, -2.0);
    sim.sync_roster(vec![remote("a", 0.0, true), drifted]);
    let b = &sim.players()[1];
    assert!((b.pos.x + MAP_BOUND).abs() < f32::EPSILON);
    assert!(b.pos.z.abs() < f32::EPSILON);
    assert!((b.pos.y - 3.0).abs() < f32::EPSILON);
}

// ============================================================================
// Map Generation
// ============================================================================

#[rstest]
#[case(12345, MapMode::Arena)]
#[case(-7, MapMode::Arena)]
#[case(0, MapMode::Platformer)]
#[case(i64::from(i32::MAX), MapMode::Platformer)]
fn layouts_are_deterministic(#[case] seed: i64, #[case] mode: MapMode) {
    let first = generate_layout(seed, mode);
    let second = generate_layout(seed, mode);
    assert_eq!(first, second);
    assert!(!first.obstacles.is_empty());
}

#[test]
fn different_seeds_differ() {
    assert_ne!(
        generate_layout(1, MapMode::Arena).obstacles,
        generate_layout(2, MapMode::Arena).obstacles
    );
}

#[test]
fn arena_keeps_clear_zone_and_separation() {
    for seed in 0..40 {
        let layout = generate_layout(seed, MapMode::Arena);
        let inner: Vec<&Obstacle> = layout.obstacles.iter().filter(|o| !is_boundary(o)).collect();

        for obstacle in &inner {
            assert!(!in_clear_zone(obstacle.pos.x, obstacle.pos.z), "seed {seed}: {}", obstacle.id);
        }
        for (i, a) in inner.iter().enumerate() {
            for b in &inner[i + 1..] {
                if same_lwall(a, b) {
                    continue;
                }
                assert!(
                    !footprints_overlap(a.pos, a.size, b.pos, b.size, 0.0),
                    "seed {seed}: {} overlaps {}",
                    a.id,
                    b.id
                );
            }
        }
        assert_eq!(layout.obstacles.iter().filter(|o| is_boundary(o)).count(), 4);
    }
}

#[test]
fn platformer_has_no_posters() {
    let layout = generate_layout(6, MapMode::Platformer);
    assert!(layout.posters.is_empty());
    assert!(layout.obstacles.iter().all(|o| o.pos.z.abs() < f32::EPSILON));
}
