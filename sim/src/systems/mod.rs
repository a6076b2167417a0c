pub mod bots;
pub mod players;
pub mod tag;
pub mod timers;
pub mod tracking;

pub use bots::bots_ai_system;
pub use players::{confine, local_intent_system, players_movement_system};
pub use tag::{it_invariant_system, repair_it_holders, tag_system};
pub use timers::{round_clock_system, tag_immunity_system};
pub use tracking::motion_tracking_system;
