//! Pixel storage descriptions and the per-pixel codec used by software
//! storage.

mod format;

pub use format::{bytes_per_pixel, decode_pixel, encode_pixel, PixelFormat, PixelType};
