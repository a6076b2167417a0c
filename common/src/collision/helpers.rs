use bevy_math::Vec3;

// Strict XZ footprint overlap of two boxes, each grown by `padding`. Touching boxes do not overlap.
#[must_use]
pub fn footprints_overlap(pos1: Vec3, size1: Vec3, pos2: Vec3, size2: Vec3, padding: f32) -> bool {
    (pos1.x - pos2.x).abs() < (size1.x + size2.x) / 2.0 + padding
        && (pos1.z - pos2.z).abs() < (size1.z + size2.z) / 2.0 + padding
}

// Penetration depth along one axis of a centered interval of half extent `half` at offset `d`.
#[must_use]
pub fn axis_penetration(d: f32, half: f32) -> f32 {
    half - d.abs()
}

// Signed push that moves an offset `d` out of the interval by `pen`.
#[must_use]
pub fn push_out(d: f32, pen: f32) -> f32 {
    if d > 0.0 { pen } else { -pen }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprints_ignore_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 50.0, 0.0);
        assert!(footprints_overlap(a, Vec3::ONE, b, Vec3::ONE, 0.0));
    }

    #[test]
    fn padding_widens_footprint() {
        let size = Vec3::new(2.0, 1.0, 2.0);
        let a = Vec3::ZERO;
        let b = Vec3::new(2.5, 0.0, 0.0);
        assert!(!footprints_overlap(a, size, b, size, 0.0));
        assert!(footprints_overlap(a, size, b, size, 1.0));
    }

    #[test]
    fn push_out_points_away_from_center() {
        assert!(push_out(0.3, 0.2) > 0.0);
        assert!(push_out(-0.3, 0.2) < 0.0);
        assert!(push_out(0.0, 0.2) < 0.0);
    }
}
