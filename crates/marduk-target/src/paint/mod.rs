//! Color values passed to clears.

mod color;

pub use color::Color;
