//! Coordinate and geometry types shared by targets and devices.
//!
//! Target space:
//! - Pixels of the target (no DPI scaling at this layer)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Device space uses the same units but its row order may be inverted; see
//! [`Rect::flipped_vertically`].

mod pixel_rect;
mod rect;
mod size;

pub use pixel_rect::PixelRect;
pub use rect::Rect;
pub use size::Size;
