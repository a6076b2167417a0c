pub mod helpers;
pub mod obstacles;

pub use helpers::footprints_overlap;
pub use obstacles::{Resolution, land_on_ledge, resolve_obstacles};
