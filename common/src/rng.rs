//! Seeded pseudo-random stream (mulberry32) used by map generation.
//!
//! Only wrapping 32-bit integer arithmetic feeds the state, so a given seed produces the same
//! sequence on every platform. Seeds outside the `u32` range wrap instead of being rejected.

const INCREMENT: u32 = 0x6d2b_79f5;
const SCALE: f64 = 4_294_967_296.0; // 2^32

#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self { state: seed as u32 }
    }

    /// Next value in [0, 1).
    pub const fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14)) as f64 / SCALE
    }

    /// Uniform float in [min, max).
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        let min = f64::from(min);
        let max = f64::from(max);
        self.next_f64().mul_add(max - min, min) as f32
    }

    /// Uniform integer in [min, max], both inclusive.
    pub fn int_range(&mut self, min: i32, max: i32) -> i32 {
        let min = f64::from(min);
        let max = f64::from(max) + 1.0;
        self.next_f64().mul_add(max - min, min).floor() as i32
    }

    // Uniform index into a slice of `len` items; `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        let picked = (self.next_f64() * len as f64).floor() as usize;
        picked.min(len.saturating_sub(1))
    }

    // Coin flip matching `next_f64() > 0.5`
    pub fn flip(&mut self) -> bool {
        self.next_f64() > 0.5
    }
}
