//! Frame-stepped simulation for the cubetag round: map generation, movement and collision, bot
//! AI, tag resolution and the round clock.
//!
//! Everything that affects gameplay is deterministic for a given map seed, AI seed, roster and
//! sequence of frame deltas and local intents.

pub mod components;
pub mod config;
pub mod constants;
pub mod map;
pub mod resources;
pub mod roster;
pub mod simulation;
pub mod systems;

pub use config::{SimConfig, init_tracing};
pub use map::generate_layout;
pub use roster::{Seat, build_roster};
pub use simulation::Simulation;
