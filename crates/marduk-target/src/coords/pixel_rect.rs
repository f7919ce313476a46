use super::{Rect, Size};

/// Integer rectangle in device pixels, as consumed by viewport, scissor and
/// readback calls.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Zero-area rectangle at the origin. As a mask it rejects every pixel.
    pub const ZERO: PixelRect = PixelRect::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Full rectangle `[0, 0] × size`.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Builds a rectangle from its edges; inverted edges give a zero extent.
    #[inline]
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let width = (i64::from(right) - i64::from(left)).max(0) as u32;
        let height = (i64::from(bottom) - i64::from(top)).max(0) as u32;
        Self::new(left, top, width, height)
    }

    #[inline]
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    #[inline]
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }

    /// Overlap of two rectangles; `None` when it has no area.
    pub fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        let w = x1 - i64::from(x0);
        let h = y1 - i64::from(y0);

        if w <= 0 || h <= 0 {
            None
        } else {
            Some(PixelRect::new(x0, y0, w as u32, h as u32))
        }
    }
}
