mod arena;
mod helpers;
mod platformer;
mod posters;

use tracing::debug;

use common::{
    protocol::{MapLayout, MapMode},
    rng::SeededRng,
};

pub use helpers::in_clear_zone;
pub use platformer::column_tops;

/// Generate the static obstacle field for a seed and mode.
///
/// Pure and deterministic: the same `(seed, mode)` yields an identical layout, obstacle order
/// included. Arena layouts also carry decorative poster anchors.
#[must_use]
pub fn generate_layout(seed: i64, mode: MapMode) -> MapLayout {
    let mut rng = SeededRng::new(seed);

    let (obstacles, posters) = match mode {
        MapMode::Arena => {
            let obstacles = arena::generate_obstacles(&mut rng);
            let posters = posters::generate_posters(&mut rng, &obstacles);
            (obstacles, posters)
        }
        MapMode::Platformer => (platformer::generate_obstacles(&mut rng), Vec::new()),
    };

    debug!(seed, ?mode, obstacles = obstacles.len(), posters = posters.len(), "generated layout");

    MapLayout {
        mode,
        seed,
        obstacles,
        posters,
    }
}
