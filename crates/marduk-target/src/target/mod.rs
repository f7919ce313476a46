//! Draw targets.
//!
//! [`DrawTarget`] holds what both target kinds share (transform pipeline,
//! clip/mask math, activation, readback); [`TargetKind`] carries what differs
//! between the display surface and an offscreen buffer.
//!
//! Convention:
//! - Clip and readback rectangles are given in target pixels, top-down.
//! - Flipped targets convert them to device row order with the same mirror.
//! - Models receive a transform into NDC `[-1, 1] × [-1, 1]`.

mod draw_target;
mod error;
mod kind;
mod model;
mod projection;

pub use draw_target::{DrawTarget, ReadOptions};
pub use error::TargetError;
pub use kind::{OffscreenBinding, TargetKind, DISPLAY_PIXEL_FORMAT, DISPLAY_PIXEL_TYPE};
pub use model::Model;
pub use projection::projection;
