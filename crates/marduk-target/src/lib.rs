//! Marduk draw targets.
//!
//! A draw target is anywhere the renderer can put pixels: the visible display
//! surface or an offscreen pixel buffer. This crate owns the parts both kinds
//! share: the pixel → NDC transform pipeline, scissor (mask) computation with
//! vertical-flip correction, destination activation, and pixel readback.
//!
//! The device itself is reached through the [`device::Device`] capability
//! trait. [`device::SoftwareDevice`] implements it on the CPU for headless use
//! and tests.

pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod pixel;
pub mod target;

pub use glam;
