pub mod navigation;
pub mod systems;
pub mod targeting;

pub use systems::bots_ai_system;
