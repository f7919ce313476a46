/// RGBA color with `f32` channels, nominally in `[0, 1]`.
///
/// Channels are passed to the device as-is; premultiplication and color space
/// are the caller's policy. Integer pixel types quantize the clamped value.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Creates a color from 8-bit channels (`0`–`255`).
    #[inline]
    pub const fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Channels in `[r, g, b, a]` order.
    #[inline]
    pub const fn channels(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Clamps all channels to `[0, 1]`. NaN channels become `0`.
    #[inline]
    pub fn clamped(self) -> Self {
        fn c(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }
}
