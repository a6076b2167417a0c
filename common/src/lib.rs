//! Shared pieces of the cubetag simulation: the data model exchanged with the front end, physics
//! constants, the seeded random stream used by map generation, and obstacle collision.
//!
//! Nothing in here touches wall-clock time or thread-local randomness, so every function is a pure
//! function of its inputs.

pub mod collision;
pub mod constants;
pub mod protocol;
pub mod rng;
