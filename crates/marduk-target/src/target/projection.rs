use glam::{Affine2, Vec2};

use crate::coords::Size;

/// Maps target pixels to normalized device coordinates.
///
/// Applied to a point: scale by `2 / size`, translate by `(-1, -1)`, then
/// negate Y when `flip_vertical`. `(0, 0)` lands on `(-1, -1)` and `size` on
/// `(1, 1)` (Y swapped when flipped).
///
/// The result is not finite for an empty `size`.
pub fn projection(size: Size, flip_vertical: bool) -> Affine2 {
    let scale = Vec2::new(2.0 / size.width as f32, 2.0 / size.height as f32);
    let normalize = Affine2::from_translation(Vec2::NEG_ONE) * Affine2::from_scale(scale);

    if flip_vertical {
        Affine2::from_scale(Vec2::new(1.0, -1.0)) * normalize
    } else {
        normalize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_maps(t: Affine2, from: Vec2, to: Vec2) {
        let got = t.transform_point2(from);
        assert!(got.abs_diff_eq(to, 1e-6), "{from} mapped to {got}, expected {to}");
    }

    #[test]
    fn corners_map_to_ndc_extremes() {
        let t = projection(Size::new(100, 50), false);
        assert_maps(t, Vec2::ZERO, Vec2::new(-1.0, -1.0));
        assert_maps(t, Vec2::new(100.0, 50.0), Vec2::new(1.0, 1.0));
        assert_maps(t, Vec2::new(50.0, 25.0), Vec2::ZERO);
    }

    #[test]
    fn flip_inverts_y_after_normalizing() {
        let t = projection(Size::new(100, 50), true);
        assert_maps(t, Vec2::ZERO, Vec2::new(-1.0, 1.0));
        assert_maps(t, Vec2::new(100.0, 50.0), Vec2::new(1.0, -1.0));
        assert_maps(t, Vec2::new(100.0, 0.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn empty_size_is_not_finite() {
        assert!(!projection(Size::ZERO, false).is_finite());
    }
}
