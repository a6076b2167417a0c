use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use common::protocol::{ControlIntent, MapMode};
use sim::{Seat, SimConfig, Simulation, build_roster, generate_layout, init_tracing};

const LOG_EVERY_SECONDS: f32 = 10.0;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Arena,
    Platformer,
    // Derived from the seed the way the room picks it
    Random,
}

#[derive(Parser)]
#[command(author, version, about = "Cubetag headless round runner", long_about = None)]
struct Args {
    // Map seed (random when omitted)
    #[arg(short, long)]
    seed: Option<i64>,

    #[arg(short, long, value_enum, default_value_t = ModeArg::Random)]
    mode: ModeArg,

    // Round length in seconds
    #[arg(short, long, default_value_t = common::constants::DEFAULT_ROUND_SECONDS)]
    duration: f32,

    // Frames per simulated second
    #[arg(long, default_value_t = 60)]
    tick_rate: u64,

    // Number of human seats; the first one is local and stands idle
    #[arg(long, default_value_t = 0)]
    humans: usize,

    // Pace frames with a wall clock instead of running as fast as possible
    #[arg(long, default_value_t = false)]
    realtime: bool,

    // Print the generated layout as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_layout: bool,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let tick_duration = frame_period(args.tick_rate)?;
    if !args.duration.is_finite() {
        bail!("round duration must be finite");
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random_range(0..i64::from(i32::MAX)));
    let mode = match args.mode {
        ModeArg::Arena => MapMode::Arena,
        ModeArg::Platformer => MapMode::Platformer,
        ModeArg::Random => MapMode::for_seed(seed),
    };

    let layout = generate_layout(seed, mode);
    info!(
        seed,
        ?mode,
        obstacles = layout.obstacles.len(),
        posters = layout.posters.len(),
        "generated layout"
    );

    if args.dump_layout {
        return dump_layout(&layout);
    }

    let ai_seed = seed as u64;
    let config = SimConfig::new(mode, ai_seed).with_round_seconds(args.duration);

    let local = (args.humans > 0).then(|| Seat::new("human-0", "Host"));
    let remotes = (1..args.humans).map(|n| Seat::new(format!("human-{n}"), format!("Guest {n}"))).collect();
    let mut spawn_rng = StdRng::seed_from_u64(ai_seed);
    let players = build_roster(local, remotes, mode, &mut spawn_rng);

    let mut sim = Simulation::new(config);
    sim.on_round_start(players, layout.obstacles);

    let delta = tick_duration.as_secs_f32();
    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let idle = ControlIntent::default();
    let mut frame: u64 = 0;
    let mut tags: usize = 0;
    let mut next_report = args.duration - LOG_EVERY_SECONDS;

    while !sim.is_expired() {
        if args.realtime {
            interval.tick().await;
        }

        let update_start = Instant::now();
        sim.step(delta, &idle);
        let update_elapsed = update_start.elapsed();

        if args.realtime && update_elapsed > tick_duration {
            warn!(
                "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                frame,
                update_elapsed.as_secs_f64() * 1000.0,
                tick_duration.as_secs_f64() * 1000.0
            );
        }

        for event in sim.last_tags() {
            debug!(frame, tagger = %event.tagger, tagged = %event.tagged, "tag");
        }
        tags += sim.last_tags().len();

        if sim.time_remaining() <= next_report {
            let it = sim.players().iter().find(|p| p.is_it).map(|p| p.name.clone());
            info!(remaining = sim.time_remaining(), it = ?it, tags, "round progress");
            next_report -= LOG_EVERY_SECONDS;
        }

        frame += 1;
    }

    if let Some(outcome) = sim.on_round_end() {
        for player in &outcome.final_players {
            info!(
                id = %player.id,
                name = %player.name,
                it = player.is_it,
                x = player.pos.x,
                y = player.pos.y,
                z = player.pos.z,
                "final"
            );
        }
        let winners: Vec<String> = outcome.winners.iter().map(ToString::to_string).collect();
        info!(frames = frame, tags, winners = ?winners, "round over");
    }

    Ok(())
}

// Frame period for a tick rate; rates that would round the period down to zero are rejected
fn frame_period(tick_rate: u64) -> Result<Duration> {
    if tick_rate == 0 {
        bail!("tick rate must be positive");
    }
    if tick_rate > NANOS_PER_SECOND {
        bail!("tick rate must be at most {NANOS_PER_SECOND} per second");
    }
    Ok(Duration::from_nanos(NANOS_PER_SECOND / tick_rate))
}

#[cfg(feature = "json")]
fn dump_layout(layout: &common::protocol::MapLayout) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(layout)?);
    Ok(())
}

#[cfg(not(feature = "json"))]
fn dump_layout(_layout: &common::protocol::MapLayout) -> Result<()> {
    bail!("layout dump needs the `json` feature");
}
