use bevy_ecs::prelude::Resource;
use tracing_subscriber::EnvFilter;

use common::{constants::DEFAULT_ROUND_SECONDS, protocol::MapMode};

// ============================================================================
// Simulation Configuration
// ============================================================================

#[derive(Resource, Debug, Clone, Copy)]
pub struct SimConfig {
    pub mode: MapMode,
    // Seeds bot decisions and jitter; map generation has its own seed
    pub ai_seed: u64,
    pub round_seconds: f32,
}

impl SimConfig {
    #[must_use]
    pub const fn new(mode: MapMode, ai_seed: u64) -> Self {
        Self {
            mode,
            ai_seed,
            round_seconds: DEFAULT_ROUND_SECONDS,
        }
    }

    #[must_use]
    pub const fn with_round_seconds(mut self, round_seconds: f32) -> Self {
        self.round_seconds = round_seconds;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(MapMode::Arena, 0)
    }
}

// ============================================================================
// Logging
// ============================================================================

const DEFAULT_LOG_FILTER: &str = "info";

// Install the global subscriber; RUST_LOG overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
