use glam::Vec2;

use super::PixelRect;

/// Axis-aligned rectangle in target pixels (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Builds a rectangle from its four edges.
    #[inline]
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn left(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Mirrors the vertical extent around a surface of the given height.
    ///
    /// `top' = height - bottom`, `bottom' = height - top`; the horizontal
    /// extent is unchanged. Applying it twice yields the original rectangle.
    #[inline]
    pub fn flipped_vertically(self, height: f32) -> Self {
        Rect::from_edges(
            self.left(),
            height - self.bottom(),
            self.right(),
            height - self.top(),
        )
    }

    /// Rounds each edge to the nearest whole pixel (halves away from zero).
    ///
    /// Edges outside the `i32` range saturate. A rectangle whose rounded right
    /// (bottom) edge is not past its left (top) edge gets a zero width (height).
    pub fn round(self) -> PixelRect {
        let r = self.normalized();
        let left = r.left().round() as i32;
        let top = r.top().round() as i32;
        let right = r.right().round() as i32;
        let bottom = r.bottom().round() as i32;

        PixelRect::from_edges(left, top, right, bottom)
    }
}
